//! Error type shared by every stage of the reorganization pipeline.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building, solving, or decoding a division model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DivisionError {
    /// Malformed distance matrix, team count, or division size.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The solver proved the model has no feasible assignment.
    ///
    /// For valid inputs this indicates a defect in the model builder.
    #[error("model is infeasible")]
    Infeasible,

    /// The solver reported an unbounded objective.
    #[error("model is unbounded")]
    Unbounded,

    /// The solve exceeded the caller-supplied time budget.
    #[error("solver exceeded its time budget of {0:?}")]
    Timeout(Duration),

    /// Any other backend failure, reported verbatim.
    #[error("solver failed: {0}")]
    Solver(String),

    /// The decoded divisions do not form an equal-size partition.
    #[error("partition integrity violated: {0}")]
    PartitionIntegrity(String),

    /// A league file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DivisionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn integrity(msg: impl Into<String>) -> Self {
        Self::PartitionIntegrity(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DivisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DivisionError::invalid("5 teams cannot form divisions of 2");
        assert_eq!(
            err.to_string(),
            "invalid input: 5 teams cannot form divisions of 2"
        );
        assert_eq!(
            DivisionError::Timeout(Duration::from_secs(3)).to_string(),
            "solver exceeded its time budget of 3s"
        );
    }
}
