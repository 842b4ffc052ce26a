//! Error kinds surfaced by verification and plot preparation.

use thiserror::Error;

/// Failure modes of the verification pipeline.
///
/// Input validation problems (`Alignment`, `Dimension`, `NonNumeric`,
/// `InvalidParameter`) are kept apart from statistical degeneracy
/// (`InsufficientData`, `Degenerate`) so callers can decide to widen the
/// reference period instead of fixing their inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    #[error("insufficient data: {available} reference years available, at least {required} required")]
    InsufficientData { available: usize, required: usize },

    #[error("alignment error: {0}")]
    Alignment(String),

    #[error("dimension error: {0}")]
    Dimension(String),

    #[error("degenerate input: {0}")]
    Degenerate(String),

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("non-numeric data: {0}")]
    NonNumeric(String),
}

impl VerificationError {
    pub(crate) fn alignment(msg: impl Into<String>) -> Self {
        Self::Alignment(msg.into())
    }

    pub(crate) fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        Self::Degenerate(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VerificationError>;
