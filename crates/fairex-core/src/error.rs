//! Core error types

use fairex_merkle::{HashValue, MerkleError};
use fairex_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or oversized chunk input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Length mismatch: expected {expected} entries, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Caller supplied a tree and root that do not belong together.
    #[error("Commitment mismatch: tree root {actual} does not match published root {expected}")]
    CommitmentMismatch {
        expected: HashValue,
        actual: HashValue,
    },

    /// The commitment machinery broke its binding guarantee. Never a data fault.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Merkle error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("Invalid transition: event {event} not allowed in phase {phase}")]
    InvalidTransition { phase: String, event: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Contract factory error: {0}")]
    Factory(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether retrying with corrected input can succeed.
    ///
    /// `InvariantViolation` is a defect in the core and always unrecoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::InvariantViolation(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
