//! Regret matching.
//!
//! Hart & Mas-Colell, "A Simple Adaptive Procedure Leading to Correlated
//! Equilibrium" (2000).
//!
//! The strategy is proportional to positive cumulative regret:
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//! and the average strategy is the plain (weight-scaled) sum of all played
//! strategies.

use crate::bandit::error::{BanditError, Result};
use crate::bandit::simplex;
use crate::bandit::traits::Bandit;

/// Unweighted cumulative-regret matching.
#[derive(Debug, Clone, PartialEq)]
pub struct RegretMatching {
    cumulative_regrets: Vec<f64>,
    cumulative_strategy: Vec<f64>,
    current_strategy: Vec<f64>,
}

impl RegretMatching {
    /// Create a bandit over `num_actions` actions.
    pub fn new(num_actions: usize) -> Result<Self> {
        if num_actions == 0 {
            return Err(BanditError::ZeroActions);
        }
        Ok(Self {
            cumulative_regrets: vec![0.0; num_actions],
            cumulative_strategy: vec![0.0; num_actions],
            current_strategy: simplex::uniform(num_actions),
        })
    }

    /// Cumulative regret of each action.
    pub fn cumulative_regrets(&self) -> &[f64] {
        &self.cumulative_regrets
    }

    /// Unnormalized sum of played strategies.
    pub fn cumulative_strategy(&self) -> &[f64] {
        &self.cumulative_strategy
    }
}

impl Bandit for RegretMatching {
    fn name(&self) -> &'static str {
        "regret_matching"
    }

    fn num_actions(&self) -> usize {
        self.current_strategy.len()
    }

    fn reset(&mut self) {
        log::trace!("resetting {}", self.name());
        self.cumulative_regrets.fill(0.0);
        self.cumulative_strategy.fill(0.0);
        simplex::fill_uniform(&mut self.current_strategy);
    }

    fn compute_weighted_strategy(&mut self, _current_time: u64, weight: f64) -> Result<&[f64]> {
        simplex::check_weight(weight)?;
        simplex::regret_match(&self.cumulative_regrets, &mut self.current_strategy);

        for (sum, &p) in self.cumulative_strategy.iter_mut().zip(&self.current_strategy) {
            *sum += weight * p;
        }
        Ok(&self.current_strategy)
    }

    fn current_strategy(&self) -> &[f64] {
        &self.current_strategy
    }

    fn observe_loss(&mut self, loss: &[f64]) -> Result<()> {
        simplex::check_vector("loss", loss, self.num_actions())?;
        let v = simplex::expected_loss(loss, &self.current_strategy);

        for (regret, &l) in self.cumulative_regrets.iter_mut().zip(loss) {
            *regret += v - l;
        }
        Ok(())
    }

    fn uses_average_strategy(&self) -> bool {
        true
    }

    fn average_strategy(&self) -> Result<Vec<f64>> {
        Ok(simplex::normalize_or_uniform(&self.cumulative_strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_actions_rejected() {
        assert_eq!(RegretMatching::new(0), Err(BanditError::ZeroActions));
    }

    #[test]
    fn test_two_action_example() {
        let mut rm = RegretMatching::new(2).unwrap();
        assert_eq!(rm.compute_strategy(1).unwrap(), &[0.5, 0.5]);

        rm.observe_loss(&[1.0, 0.0]).unwrap();
        assert_eq!(rm.cumulative_regrets(), &[-0.5, 0.5]);

        assert_eq!(rm.compute_strategy(2).unwrap(), &[0.0, 1.0]);
        assert_eq!(rm.cumulative_strategy(), &[0.5, 1.5]);
        assert_eq!(rm.average_strategy().unwrap(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_negative_regret_persists() {
        // Without clipping, early negative regret masks action 0 for a while.
        let mut rm = RegretMatching::new(2).unwrap();
        rm.compute_strategy(1).unwrap();
        rm.observe_loss(&[10.0, 0.0]).unwrap();

        rm.compute_strategy(2).unwrap();
        rm.observe_loss(&[0.0, 1.0]).unwrap();
        assert_eq!(rm.cumulative_regrets(), &[-4.0, 5.0]);
        assert_eq!(rm.compute_strategy(3).unwrap(), &[0.0, 1.0]);
    }

    #[test]
    fn test_weight_scales_average_only() {
        let mut rm = RegretMatching::new(2).unwrap();
        rm.compute_weighted_strategy(1, 0.0).unwrap();
        assert_eq!(rm.cumulative_strategy(), &[0.0, 0.0]);
        assert_eq!(rm.average_strategy().unwrap(), vec![0.5, 0.5]);

        rm.observe_loss(&[1.0, 0.0]).unwrap();
        rm.compute_weighted_strategy(2, 3.0).unwrap();
        assert_eq!(rm.cumulative_strategy(), &[0.0, 3.0]);
        assert_eq!(rm.current_strategy(), &[0.0, 1.0]);
    }

    #[test]
    fn test_invalid_inputs_leave_state_unchanged() {
        let mut rm = RegretMatching::new(3).unwrap();
        rm.compute_strategy(1).unwrap();
        let before = rm.clone();

        assert!(matches!(
            rm.observe_loss(&[1.0, 2.0]),
            Err(BanditError::LengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(matches!(
            rm.observe_loss(&[1.0, f64::NAN, 0.0]),
            Err(BanditError::NonFinite { index: 1, .. })
        ));
        assert_eq!(
            rm.compute_weighted_strategy(2, -1.0),
            Err(BanditError::InvalidWeight(-1.0))
        );
        assert_eq!(rm, before);
    }

    #[test]
    fn test_reset_restores_constructed_state() {
        let mut rm = RegretMatching::new(3).unwrap();
        rm.compute_strategy(1).unwrap();
        rm.observe_loss(&[0.3, 0.1, 0.9]).unwrap();
        rm.compute_strategy(2).unwrap();

        rm.reset();
        assert_eq!(rm, RegretMatching::new(3).unwrap());
    }

    #[test]
    fn test_unsupported_capabilities() {
        let mut rm = RegretMatching::new(2).unwrap();
        assert!(rm.uses_average_strategy());
        assert!(!rm.uses_predictions());
        assert!(!rm.uses_context());
        assert!(rm.observe_prediction(&[0.0, 0.0]).is_err());
        assert!(rm.observe_context(&[0.0]).is_err());
    }
}
