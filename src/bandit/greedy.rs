//! Follow-the-leader and epsilon-greedy.
//!
//! Follow-the-leader plays the action(s) with the smallest cumulative loss,
//! optionally adding a forecast of the next loss ("be the leader"). Ties
//! within `1e-12` split the mass evenly, so the strategy is deterministic.
//!
//! Epsilon-greedy mixes the leader distribution with uniform exploration:
//! ```text
//! Strategy(a) = (1 - ε) * Leader(a) + ε / n
//! ```

use crate::bandit::config::ConfigError;
use crate::bandit::error::{BanditError, Result};
use crate::bandit::simplex;
use crate::bandit::traits::Bandit;

const TIE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
struct Leader {
    epsilon: f64,
    cumulative_losses: Vec<f64>,
    cumulative_strategy: Vec<f64>,
    current_strategy: Vec<f64>,
    prediction: Option<Vec<f64>>,
}

impl Leader {
    fn new(num_actions: usize, epsilon: f64) -> Result<Self> {
        if num_actions == 0 {
            return Err(BanditError::ZeroActions);
        }
        validate_epsilon(epsilon)?;
        Ok(Self {
            epsilon,
            cumulative_losses: vec![0.0; num_actions],
            cumulative_strategy: vec![0.0; num_actions],
            current_strategy: simplex::uniform(num_actions),
            prediction: None,
        })
    }

    fn reset(&mut self) {
        self.cumulative_losses.fill(0.0);
        self.cumulative_strategy.fill(0.0);
        simplex::fill_uniform(&mut self.current_strategy);
        self.prediction = None;
    }

    fn compute(&mut self, weight: f64) -> Result<&[f64]> {
        simplex::check_weight(weight)?;
        let leaders = match self.prediction.take() {
            Some(forecast) => {
                let scores: Vec<f64> = self
                    .cumulative_losses
                    .iter()
                    .zip(&forecast)
                    .map(|(&l, &m)| l + m)
                    .collect();
                simplex::argmin_set(&scores, TIE)
            }
            None => simplex::argmin_set(&self.cumulative_losses, TIE),
        };

        let n = self.current_strategy.len() as f64;
        let explore = self.epsilon / n;
        let exploit = (1.0 - self.epsilon) / leaders.len() as f64;
        self.current_strategy.iter_mut().for_each(|x| *x = explore);
        for &i in &leaders {
            self.current_strategy[i] += exploit;
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
        Ok(())
    }

    fn observe_prediction(&mut self, prediction: &[f64]) -> Result<()> {
        simplex::check_vector("prediction", prediction, self.current_strategy.len())?;
        self.prediction = Some(prediction.to_vec());
        Ok(())
    }
}

/// Exploration rates must lie in `[0, 1]`.
pub fn validate_epsilon(epsilon: f64) -> std::result::Result<(), ConfigError> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEpsilon(epsilon))
    }
}

/// Play the empirical best action(s).
#[derive(Debug, Clone, PartialEq)]
pub struct FollowTheLeader {
    inner: Leader,
}

impl FollowTheLeader {
    /// Create a bandit over `num_actions` actions.
    pub fn new(num_actions: usize) -> Result<Self> {
        Ok(Self {
            inner: Leader::new(num_actions, 0.0)?,
        })
    }

    /// Cumulative loss of each action.
    pub fn cumulative_losses(&self) -> &[f64] {
        &self.inner.cumulative_losses
    }
}

/// Follow-the-leader with uniform exploration mass `ε`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsGreedy {
    inner: Leader,
}

impl EpsGreedy {
    /// Default exploration rate.
    pub const DEFAULT_EPSILON: f64 = 0.1;

    /// Create a bandit over `num_actions` actions exploring with rate `ε`.
    pub fn new(num_actions: usize, epsilon: f64) -> Result<Self> {
        Ok(Self {
            inner: Leader::new(num_actions, epsilon)?,
        })
    }

    /// The exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.inner.epsilon
    }
}

macro_rules! impl_leader_bandit {
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

            fn uses_predictions(&self) -> bool {
                true
            }

            fn observe_prediction(&mut self, prediction: &[f64]) -> Result<()> {
                self.inner.observe_prediction(prediction)
            }
        }
    };
}

impl_leader_bandit!(FollowTheLeader, "follow_the_leader");
impl_leader_bandit!(EpsGreedy, "eps_greedy");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_takes_all_mass() {
        let mut ftl = FollowTheLeader::new(3).unwrap();
        assert_eq!(ftl.compute_strategy(1).unwrap(), &[1.0 / 3.0; 3]);
        ftl.observe_loss(&[0.5, 0.2, 0.9]).unwrap();
        assert_eq!(ftl.compute_strategy(2).unwrap(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_ties_split_evenly() {
        let mut ftl = FollowTheLeader::new(3).unwrap();
        ftl.compute_strategy(1).unwrap();
        ftl.observe_loss(&[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(ftl.compute_strategy(2).unwrap(), &[0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_prediction_shifts_leader() {
        let mut ftl = FollowTheLeader::new(2).unwrap();
        ftl.compute_strategy(1).unwrap();
        ftl.observe_loss(&[0.0, 1.0]).unwrap();

        ftl.observe_prediction(&[2.0, 0.0]).unwrap();
        assert_eq!(ftl.compute_strategy(2).unwrap(), &[0.0, 1.0]);
        // Forecast consumed: back to the cumulative leader.
        assert_eq!(ftl.compute_strategy(3).unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn test_eps_greedy_mixture() {
        let mut eg = EpsGreedy::new(4, 0.2).unwrap();
        eg.compute_strategy(1).unwrap();
        eg.observe_loss(&[1.0, 1.0, 0.0, 1.0]).unwrap();

        let strategy = eg.compute_strategy(2).unwrap();
        assert!((strategy[2] - 0.85).abs() < 1e-12);
        assert!((strategy[0] - 0.05).abs() < 1e-12);
        assert!(simplex::is_distribution(strategy, simplex::TOLERANCE));
    }

    #[test]
    fn test_eps_bounds() {
        assert!(EpsGreedy::new(2, 0.0).is_ok());
        assert!(EpsGreedy::new(2, 1.0).is_ok());
        assert_eq!(
            EpsGreedy::new(2, 1.5),
            Err(BanditError::Config(ConfigError::InvalidEpsilon(1.5)))
        );
        assert!(EpsGreedy::new(2, f64::NAN).is_err());
        assert_eq!(FollowTheLeader::new(0), Err(BanditError::ZeroActions));
    }

    #[test]
    fn test_reset() {
        let mut eg = EpsGreedy::new(3, 0.1).unwrap();
        eg.compute_strategy(1).unwrap();
        eg.observe_loss(&[0.0, 1.0, 2.0]).unwrap();
        eg.observe_prediction(&[1.0, 0.0, 0.0]).unwrap();
        eg.reset();
        assert_eq!(eg, EpsGreedy::new(3, 0.1).unwrap());
        assert_eq!(eg.epsilon(), 0.1);
    }
}
