//! Tabular Q-learning over (situational state, action category) pairs
//!
//! This module holds the long-lived learning state: the value table with its
//! epsilon-greedy policy and one-step Q-learning update, the hand-authored
//! reward table it scores outcomes against, and snapshot serialization for
//! checkpointing a learner between runs.
//!
//! ## Masking
//!
//! The two algorithms mask the Q matrix differently, on purpose:
//!
//! - [`ValueTable::choose_action`] *excludes* infeasible cells, so the chosen
//!   action always corresponds to a truly legal move;
//! - [`ValueTable::update`] *zero-fills* infeasible cells of the post-move
//!   matrix, so "no legal continuation" enters the TD target as a legitimate
//!   zero future value rather than being dropped.

pub mod q_table;
pub mod rewards;
pub mod serialization;

// Public re-exports
pub use q_table::{DEFAULT_EPSILON, DEFAULT_GAMMA, DEFAULT_LEARNING_RATE, ValueTable};
pub use rewards::RewardTable;
pub use serialization::SavedValueTable;
