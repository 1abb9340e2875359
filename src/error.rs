//! Error types for the ludo-rl crate

use thiserror::Error;

/// Main error type for the ludo-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no pending decision: apply_reward called before select_piece")]
    NoPendingDecision,

    #[error("cell ({state}, {category}) is out of bounds for a {states}x{categories} value table")]
    CellOutOfBounds {
        state: usize,
        category: usize,
        states: usize,
        categories: usize,
    },

    #[error("classifier failed: {message}")]
    Classifier { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
