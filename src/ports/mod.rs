//! Ports (trait boundaries) for external dependencies.
//!
//! The rules engine lives outside this crate; the classifier port is the
//! seam through which it feeds legal-move classifications to the learner.

pub mod classifier;

pub use classifier::MoveClassifier;
