//! Tabular reinforcement-learning decision engine for a Ludo-like race game
//!
//! This crate provides:
//! - A per-turn action registry mapping (situational state, action category)
//!   pairs to feasibility and to the piece realizing each pair
//! - A value table with an epsilon-greedy policy and one-step Q-learning
//!   update over hand-authored per-outcome rewards
//! - A decision agent composing the two behind a classifier port implemented
//!   by the surrounding rules engine
//! - Snapshot serialization for checkpointing a trained learner
//!
//! The engine is single-threaded and synchronous: one agent instance drives
//! one value table, one decision point at a time. Seed the value table for
//! reproducible exploration and tie-breaking.

pub mod agent;
pub mod error;
pub mod ports;
pub mod q_learning;
pub mod registry;
pub mod types;

pub use agent::DecisionAgent;
pub use error::{Error, Result};
pub use ports::MoveClassifier;
pub use q_learning::{RewardTable, SavedValueTable, ValueTable};
pub use registry::{ActionRegistry, Feasibility};
pub use types::{ActionCategory, MoveKind, StateAction, Zone};
