//! Exponential weights: Hedge and optimistic Hedge.
//!
//! Hedge plays `x(a) ∝ exp(-η L(a))` where `L` is the cumulative loss.
//! Optimistic Hedge (Syrgkanis, Agarwal, Luo, Schapire, "Fast Convergence of
//! Regularized Learning in Games", 2015) counts the last loss twice,
//! `x(a) ∝ exp(-η (L(a) + ℓ_last(a)))`, which speeds up convergence in
//! self-play. Both keep a plain (weight-scaled) average strategy.

use crate::bandit::config::ConfigError;
use crate::bandit::error::{BanditError, Result};
use crate::bandit::simplex;
use crate::bandit::traits::Bandit;

#[derive(Debug, Clone, PartialEq)]
struct ExpWeights {
    learning_rate: f64,
    cumulative_losses: Vec<f64>,
    last_loss: Vec<f64>,
    cumulative_strategy: Vec<f64>,
    current_strategy: Vec<f64>,
    optimistic: bool,
}

impl ExpWeights {
    fn new(num_actions: usize, learning_rate: f64, optimistic: bool) -> Result<Self> {
        if num_actions == 0 {
            return Err(BanditError::ZeroActions);
        }
        validate_learning_rate(learning_rate)?;
        Ok(Self {
            learning_rate,
            cumulative_losses: vec![0.0; num_actions],
            last_loss: vec![0.0; num_actions],
            cumulative_strategy: vec![0.0; num_actions],
            current_strategy: simplex::uniform(num_actions),
            optimistic,
        })
    }

    fn reset(&mut self) {
        self.cumulative_losses.fill(0.0);
        self.last_loss.fill(0.0);
        self.cumulative_strategy.fill(0.0);
        simplex::fill_uniform(&mut self.current_strategy);
    }

    fn compute(&mut self, weight: f64) -> Result<&[f64]> {
        simplex::check_weight(weight)?;
        if self.optimistic {
            let scores: Vec<f64> = self
                .cumulative_losses
                .iter()
                .zip(&self.last_loss)
                .map(|(&l, &m)| l + m)
                .collect();
            simplex::softmin_into(&scores, self.learning_rate, &mut self.current_strategy);
        } else {
            simplex::softmin_into(
                &self.cumulative_losses,
                self.learning_rate,
                &mut self.current_strategy,
            );
        }

        for (sum, &p) in self.cumulative_strategy.iter_mut().zip(&self.current_strategy) {
            *sum += weight * p;
        }
        Ok(&self.current_strategy)
    }

    fn observe_loss(&mut self, loss: &[f64]) -> Result<()> {
        simplex::check_vector("loss", loss, self.current_strategy.len())?;
        for (total, &l) in self.cumulative_losses.iter_mut().zip(loss) {
            *total += l;
        }
        self.last_loss.copy_from_slice(loss);
        Ok(())
    }
}

/// Learning rates must be finite and positive.
pub fn validate_learning_rate(learning_rate: f64) -> std::result::Result<(), ConfigError> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLearningRate(learning_rate))
    }
}

/// Full-information exponential weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Hedge {
    inner: ExpWeights,
}

impl Hedge {
    /// Default learning rate `η`.
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

    /// Create a bandit over `num_actions` actions with learning rate `η`.
    pub fn new(num_actions: usize, learning_rate: f64) -> Result<Self> {
        Ok(Self {
            inner: ExpWeights::new(num_actions, learning_rate, false)?,
        })
    }

    /// Cumulative loss of each action.
    pub fn cumulative_losses(&self) -> &[f64] {
        &self.inner.cumulative_losses
    }
}

/// Exponential weights with the last loss as an optimistic forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticHedge {
    inner: ExpWeights,
}

impl OptimisticHedge {
    /// Create a bandit over `num_actions` actions with learning rate `η`.
    pub fn new(num_actions: usize, learning_rate: f64) -> Result<Self> {
        Ok(Self {
            inner: ExpWeights::new(num_actions, learning_rate, true)?,
        })
    }

    /// Cumulative loss of each action.
    pub fn cumulative_losses(&self) -> &[f64] {
        &self.inner.cumulative_losses
    }
}

macro_rules! impl_exp_weights_bandit {
    ($type:ty, $name:literal) => {
        impl Bandit for $type {
            fn name(&self) -> &'static str {
                $name
            }

            fn num_actions(&self) -> usize {
                self.inner.current_strategy.len()
            }

            fn reset(&mut self) {
                log::trace!("resetting {}", $name);
                self.inner.reset();
            }

            fn compute_weighted_strategy(&mut self, _current_time: u64, weight: f64) -> Result<&[f64]> {
                self.inner.compute(weight)
            }

            fn current_strategy(&self) -> &[f64] {
                &self.inner.current_strategy
            }

            fn observe_loss(&mut self, loss: &[f64]) -> Result<()> {
                self.inner.observe_loss(loss)
            }

            fn uses_average_strategy(&self) -> bool {
                true
            }

            fn average_strategy(&self) -> Result<Vec<f64>> {
                Ok(simplex::normalize_or_uniform(&self.inner.cumulative_strategy))
            }
        }
    };
}

impl_exp_weights_bandit!(Hedge, "hedge");
impl_exp_weights_bandit!(OptimisticHedge, "optimistic_hedge");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_learning_rate() {
        assert_eq!(
            Hedge::new(2, 0.0),
            Err(BanditError::Config(ConfigError::InvalidLearningRate(0.0)))
        );
        assert!(Hedge::new(2, -0.5).is_err());
        assert!(OptimisticHedge::new(2, f64::INFINITY).is_err());
        assert_eq!(Hedge::new(0, 0.1), Err(BanditError::ZeroActions));
    }

    #[test]
    fn test_hedge_weights() {
        let mut hedge = Hedge::new(2, 1.0).unwrap();
        assert_eq!(hedge.compute_strategy(1).unwrap(), &[0.5, 0.5]);
        hedge.observe_loss(&[1.0, 0.0]).unwrap();
        assert_eq!(hedge.cumulative_losses(), &[1.0, 0.0]);

        let strategy = hedge.compute_strategy(2).unwrap();
        let e = (-1.0f64).exp();
        assert!((strategy[0] - e / (1.0 + e)).abs() < 1e-12);
        assert!((strategy[1] - 1.0 / (1.0 + e)).abs() < 1e-12);
    }

    #[test]
    fn test_optimistic_counts_last_loss_twice() {
        let mut hedge = OptimisticHedge::new(2, 1.0).unwrap();
        hedge.compute_strategy(1).unwrap();
        hedge.observe_loss(&[1.0, 0.0]).unwrap();

        let strategy = hedge.compute_strategy(2).unwrap();
        let e = (-2.0f64).exp();
        assert!((strategy[0] - e / (1.0 + e)).abs() < 1e-12);
    }

    #[test]
    fn test_large_losses_stay_normalized() {
        let mut hedge = Hedge::new(3, 5.0).unwrap();
        for t in 1..=50 {
            let strategy = hedge.compute_strategy(t).unwrap();
            assert!(simplex::is_distribution(strategy, simplex::TOLERANCE));
            hedge.observe_loss(&[1e6, 0.0, 1e3]).unwrap();
        }
        assert_eq!(hedge.current_strategy()[1], 1.0);
    }

    #[test]
    fn test_reset() {
        let mut hedge = OptimisticHedge::new(2, 0.3).unwrap();
        hedge.compute_strategy(1).unwrap();
        hedge.observe_loss(&[0.2, 0.7]).unwrap();
        hedge.reset();
        assert_eq!(hedge, OptimisticHedge::new(2, 0.3).unwrap());
        assert!(!hedge.uses_predictions());
    }
}
