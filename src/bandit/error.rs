//! Error types for bandit construction and the per-step protocol.
//!
//! Every error here is a caller bug: the bandit never recovers from one
//! internally, and a call that returns an error leaves the bandit untouched.

use thiserror::Error;

use crate::bandit::config::ConfigError;

/// Errors surfaced by bandits and the containers that own them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    /// A bandit must have at least one action.
    #[error("num_actions must be greater than 0")]
    ZeroActions,

    /// A capability-gated operation was called on a variant without it.
    #[error("{operation}() is not implemented for {algorithm}")]
    Unsupported {
        /// Algorithm name, as returned by `Bandit::name`.
        algorithm: &'static str,
        /// The operation that was called.
        operation: &'static str,
    },

    /// A loss or prediction vector does not match the action count.
    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Which input was malformed ("loss", "prediction").
        what: &'static str,
        /// The bandit's action count.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// A loss or prediction entry is NaN or infinite.
    #[error("{what}[{index}] is not finite")]
    NonFinite {
        /// Which input was malformed.
        what: &'static str,
        /// Index of the first offending entry.
        index: usize,
    },

    /// Average-strategy weights must be finite and non-negative.
    #[error("weight {0} must be finite and non-negative")]
    InvalidWeight(f64),

    /// Hyper-parameter validation failed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A decision point was revisited with a different number of actions.
    #[error("decision point '{key}' has {expected} actions, got {actual}")]
    ActionCountMismatch {
        /// Decision point key.
        key: String,
        /// Action count the bandit was built with.
        expected: usize,
        /// Action count requested now.
        actual: usize,
    },

    /// A payoff matrix is empty or ragged.
    #[error("invalid payoff matrix: {0}")]
    InvalidGame(String),
}

impl BanditError {
    /// Error for a capability-gated operation `algorithm` lacks.
    pub fn unsupported(algorithm: &'static str, operation: &'static str) -> Self {
        BanditError::Unsupported { algorithm, operation }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BanditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BanditError::Unsupported {
            algorithm: "hedge",
            operation: "observe_context",
        };
        assert_eq!(err.to_string(), "observe_context() is not implemented for hedge");

        let err = BanditError::LengthMismatch {
            what: "loss",
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "loss has 2 entries, expected 3");
    }

    #[test]
    fn test_unsupported_constructor() {
        assert_eq!(
            BanditError::unsupported("regret_matching", "observe_prediction"),
            BanditError::Unsupported {
                algorithm: "regret_matching",
                operation: "observe_prediction"
            }
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: BanditError = ConfigError::InvalidEpsilon(1.5).into();
        assert!(matches!(err, BanditError::Config(ConfigError::InvalidEpsilon(_))));
    }
}
