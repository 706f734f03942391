//! Configuration for building bandits.
//!
//! A `BanditConfig` names an algorithm together with its hyper-parameters.
//! Solvers keep one config and build a fresh bandit for every decision point
//! they discover, so the config is cheap to clone and serializable for
//! checkpoints and command-line JSON files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bandit::discounted::DiscountedRegretMatching;
use crate::bandit::error::Result;
use crate::bandit::greedy::{validate_epsilon, EpsGreedy, FollowTheLeader};
use crate::bandit::hedge::{validate_learning_rate, Hedge, OptimisticHedge};
use crate::bandit::predictive::{PredictiveRegretMatching, PredictiveRegretMatchingPlus};
use crate::bandit::regret_matching::RegretMatching;
use crate::bandit::regret_matching_plus::RegretMatchingPlus;
use crate::bandit::traits::Bandit;

/// Which bandit algorithm to build, and its hyper-parameters.
///
/// Serialized with an `algorithm` tag:
/// ```
/// use regret_bandits::bandit::BanditConfig;
///
/// let config: BanditConfig =
///     serde_json::from_str(r#"{"algorithm": "hedge", "learning_rate": 0.5}"#).unwrap();
/// assert_eq!(config, BanditConfig::hedge(0.5));
///
/// // Regret matching+ is the default, as CFR+ is for solvers.
/// assert_eq!(BanditConfig::default(), BanditConfig::RegretMatchingPlus);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum BanditConfig {
    /// Plain regret matching.
    RegretMatching,

    /// Regret matching+ (clipped regrets, linear averaging).
    RegretMatchingPlus,

    /// Regret matching with loss forecasts.
    PredictiveRegretMatching,

    /// Regret matching+ with loss forecasts.
    PredictiveRegretMatchingPlus,

    /// Discounted regret matching with exponents `α, β, γ`.
    DiscountedRegretMatching {
        /// Exponent for positive regrets.
        #[serde(default = "default_alpha")]
        alpha: f64,
        /// Exponent for negative regrets.
        #[serde(default = "default_beta")]
        beta: f64,
        /// Exponent for the average strategy.
        #[serde(default = "default_gamma")]
        gamma: f64,
    },

    /// Exponential weights.
    Hedge {
        /// Learning rate `η > 0`.
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
    },

    /// Exponential weights with an optimistic last-loss term.
    OptimisticHedge {
        /// Learning rate `η > 0`.
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
    },

    /// Play the empirical best action(s).
    FollowTheLeader,

    /// Follow-the-leader with uniform exploration.
    EpsGreedy {
        /// Exploration rate in `[0, 1]`.
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
}

fn default_alpha() -> f64 {
    DiscountedRegretMatching::DEFAULT_ALPHA
}

fn default_beta() -> f64 {
    DiscountedRegretMatching::DEFAULT_BETA
}

fn default_gamma() -> f64 {
    DiscountedRegretMatching::DEFAULT_GAMMA
}

fn default_learning_rate() -> f64 {
    Hedge::DEFAULT_LEARNING_RATE
}

fn default_epsilon() -> f64 {
    EpsGreedy::DEFAULT_EPSILON
}

impl Default for BanditConfig {
    fn default() -> Self {
        BanditConfig::RegretMatchingPlus
    }
}

impl BanditConfig {
    /// Plain regret matching.
    pub fn regret_matching() -> Self {
        BanditConfig::RegretMatching
    }

    /// Regret matching+.
    pub fn regret_matching_plus() -> Self {
        BanditConfig::RegretMatchingPlus
    }

    /// Discounted regret matching.
    ///
    /// # Arguments
    /// * `alpha` - Positive regret exponent (typically 1.5)
    /// * `beta` - Negative regret exponent (typically 0.0)
    /// * `gamma` - Average strategy exponent (typically 2.0)
    pub fn discounted(alpha: f64, beta: f64, gamma: f64) -> Self {
        BanditConfig::DiscountedRegretMatching { alpha, beta, gamma }
    }

    /// Hedge with learning rate `η`.
    pub fn hedge(learning_rate: f64) -> Self {
        BanditConfig::Hedge { learning_rate }
    }

    /// Optimistic Hedge with learning rate `η`.
    pub fn optimistic_hedge(learning_rate: f64) -> Self {
        BanditConfig::OptimisticHedge { learning_rate }
    }

    /// Epsilon-greedy with exploration rate `ε`.
    pub fn eps_greedy(epsilon: f64) -> Self {
        BanditConfig::EpsGreedy { epsilon }
    }

    /// Every algorithm with its default hyper-parameters.
    pub fn all() -> Vec<Self> {
        vec![
            BanditConfig::RegretMatching,
            BanditConfig::RegretMatchingPlus,
            BanditConfig::PredictiveRegretMatching,
            BanditConfig::PredictiveRegretMatchingPlus,
            BanditConfig::discounted(default_alpha(), default_beta(), default_gamma()),
            BanditConfig::hedge(default_learning_rate()),
            BanditConfig::optimistic_hedge(default_learning_rate()),
            BanditConfig::FollowTheLeader,
            BanditConfig::eps_greedy(default_epsilon()),
        ]
    }

    /// Validate the hyper-parameters.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        match *self {
            BanditConfig::DiscountedRegretMatching { alpha, beta, gamma } => {
                DiscountedRegretMatching::validate(alpha, beta, gamma)
            }
            BanditConfig::Hedge { learning_rate } | BanditConfig::OptimisticHedge { learning_rate } => {
                validate_learning_rate(learning_rate)
            }
            BanditConfig::EpsGreedy { epsilon } => validate_epsilon(epsilon),
            _ => Ok(()),
        }
    }

    /// Build a bandit over `num_actions` actions.
    pub fn build(&self, num_actions: usize) -> Result<Box<dyn Bandit>> {
        let bandit: Box<dyn Bandit> = match *self {
            BanditConfig::RegretMatching => Box::new(RegretMatching::new(num_actions)?),
            BanditConfig::RegretMatchingPlus => Box::new(RegretMatchingPlus::new(num_actions)?),
            BanditConfig::PredictiveRegretMatching => {
                Box::new(PredictiveRegretMatching::new(num_actions)?)
            }
            BanditConfig::PredictiveRegretMatchingPlus => {
                Box::new(PredictiveRegretMatchingPlus::new(num_actions)?)
            }
            BanditConfig::DiscountedRegretMatching { alpha, beta, gamma } => Box::new(
                DiscountedRegretMatching::new(num_actions, alpha, beta, gamma)?,
            ),
            BanditConfig::Hedge { learning_rate } => Box::new(Hedge::new(num_actions, learning_rate)?),
            BanditConfig::OptimisticHedge { learning_rate } => {
                Box::new(OptimisticHedge::new(num_actions, learning_rate)?)
            }
            BanditConfig::FollowTheLeader => Box::new(FollowTheLeader::new(num_actions)?),
            BanditConfig::EpsGreedy { epsilon } => Box::new(EpsGreedy::new(num_actions, epsilon)?),
        };
        log::debug!("built {} over {} actions", bandit.name(), num_actions);
        Ok(bandit)
    }
}

/// Errors that can occur when validating bandit hyper-parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Learning rate is not finite and positive.
    #[error("learning rate {0} must be finite and positive")]
    InvalidLearningRate(f64),

    /// Exploration rate is out of range [0, 1].
    #[error("exploration rate {0} is out of range [0, 1]")]
    InvalidEpsilon(f64),

    /// A discount exponent is NaN or out of range.
    #[error("{0} discount exponent {1} is out of range")]
    InvalidDiscount(&'static str, f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bandit::error::BanditError;

    #[test]
    fn test_default_is_regret_matching_plus() {
        let bandit = BanditConfig::default().build(3).unwrap();
        assert_eq!(bandit.name(), "regret_matching_plus");
        assert_eq!(bandit.num_actions(), 3);
    }

    #[test]
    fn test_build_every_algorithm() {
        let names: Vec<&str> = BanditConfig::all()
            .iter()
            .map(|config| config.build(2).unwrap().name())
            .collect();
        assert_eq!(
            names,
            vec![
                "regret_matching",
                "regret_matching_plus",
                "predictive_regret_matching",
                "predictive_regret_matching_plus",
                "discounted_regret_matching",
                "hedge",
                "optimistic_hedge",
                "follow_the_leader",
                "eps_greedy",
            ]
        );
    }

    #[test]
    fn test_build_rejects_zero_actions() {
        for config in BanditConfig::all() {
            assert_eq!(config.build(0).unwrap_err(), BanditError::ZeroActions);
        }
    }

    #[test]
    fn test_validate() {
        for config in BanditConfig::all() {
            assert!(config.validate().is_ok(), "{:?}", config);
        }
        assert_eq!(
            BanditConfig::hedge(0.0).validate(),
            Err(ConfigError::InvalidLearningRate(0.0))
        );
        assert_eq!(
            BanditConfig::eps_greedy(-0.1).validate(),
            Err(ConfigError::InvalidEpsilon(-0.1))
        );
        assert!(BanditConfig::discounted(1.5, 0.0, -2.0).validate().is_err());
        assert!(matches!(
            BanditConfig::optimistic_hedge(-1.0).build(2).unwrap_err(),
            BanditError::Config(ConfigError::InvalidLearningRate(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_and_defaults() {
        let config = BanditConfig::discounted(1.0, 0.5, 1.0);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"algorithm\":\"discounted_regret_matching\""));
        assert_eq!(serde_json::from_str::<BanditConfig>(&json).unwrap(), config);

        let parsed: BanditConfig =
            serde_json::from_str(r#"{"algorithm": "discounted_regret_matching"}"#).unwrap();
        assert_eq!(parsed, BanditConfig::discounted(1.5, 0.0, 2.0));

        let parsed: BanditConfig = serde_json::from_str(r#"{"algorithm": "eps_greedy"}"#).unwrap();
        assert_eq!(parsed, BanditConfig::eps_greedy(0.1));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        assert!(serde_json::from_str::<BanditConfig>(r#"{"algorithm": "exp3"}"#).is_err());
    }
}
