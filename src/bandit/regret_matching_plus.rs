//! Regret matching+.
//!
//! Tammelin, "Solving Large Imperfect Information Games Using CFR+" (2014).
//!
//! Two changes from plain regret matching:
//! - cumulative regrets are floored at zero after every update, so an action
//!   that was bad early can recover as soon as it becomes good;
//! - the average strategy weights iteration `t` by `t`, favouring later and
//!   more converged iterates.
//!
//! The weighting uses an internal counter, not the caller's `current_time`.

use crate::bandit::error::{BanditError, Result};
use crate::bandit::simplex;
use crate::bandit::traits::Bandit;

/// Non-negative regret matching with linear averaging.
#[derive(Debug, Clone, PartialEq)]
pub struct RegretMatchingPlus {
    cumulative_regrets: Vec<f64>,
    cumulative_strategy: Vec<f64>,
    current_strategy: Vec<f64>,
    time: u64,
}

impl RegretMatchingPlus {
    /// Create a bandit over `num_actions` actions.
    pub fn new(num_actions: usize) -> Result<Self> {
        if num_actions == 0 {
            return Err(BanditError::ZeroActions);
        }
        Ok(Self {
            cumulative_regrets: vec![0.0; num_actions],
            cumulative_strategy: vec![0.0; num_actions],
            current_strategy: simplex::uniform(num_actions),
            time: 1,
        })
    }

    /// Cumulative (non-negative) regret of each action.
    pub fn cumulative_regrets(&self) -> &[f64] {
        &self.cumulative_regrets
    }

    /// Unnormalized, time-weighted sum of played strategies.
    pub fn cumulative_strategy(&self) -> &[f64] {
        &self.cumulative_strategy
    }

    /// Weight the next computed strategy will receive.
    pub fn time(&self) -> u64 {
        self.time
    }
}

impl Bandit for RegretMatchingPlus {
    fn name(&self) -> &'static str {
        "regret_matching_plus"
    }

    fn num_actions(&self) -> usize {
        self.current_strategy.len()
    }

    fn reset(&mut self) {
        log::trace!("resetting {}", self.name());
        self.cumulative_regrets.fill(0.0);
        self.cumulative_strategy.fill(0.0);
        simplex::fill_uniform(&mut self.current_strategy);
        self.time = 1;
    }

    fn compute_weighted_strategy(&mut self, _current_time: u64, weight: f64) -> Result<&[f64]> {
        simplex::check_weight(weight)?;
        simplex::regret_match(&self.cumulative_regrets, &mut self.current_strategy);

        let scale = self.time as f64 * weight;
        for (sum, &p) in self.cumulative_strategy.iter_mut().zip(&self.current_strategy) {
            *sum += scale * p;
        }
        self.time += 1;
        Ok(&self.current_strategy)
    }

    fn current_strategy(&self) -> &[f64] {
        &self.current_strategy
    }

    fn observe_loss(&mut self, loss: &[f64]) -> Result<()> {
        simplex::check_vector("loss", loss, self.num_actions())?;
        let v = simplex::expected_loss(loss, &self.current_strategy);

        for (regret, &l) in self.cumulative_regrets.iter_mut().zip(loss) {
            *regret = (*regret + v - l).max(0.0);
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
        assert_eq!(RegretMatchingPlus::new(0), Err(BanditError::ZeroActions));
    }

    #[test]
    fn test_negative_regret_clipped() {
        let mut rm = RegretMatchingPlus::new(2).unwrap();
        assert_eq!(rm.compute_strategy(1).unwrap(), &[0.5, 0.5]);

        rm.observe_loss(&[1.0, 0.0]).unwrap();
        assert_eq!(rm.cumulative_regrets(), &[0.0, 0.5]);
        assert_eq!(rm.compute_strategy(2).unwrap(), &[0.0, 1.0]);
    }

    #[test]
    fn test_clipped_action_recovers_immediately() {
        let mut rm = RegretMatchingPlus::new(2).unwrap();
        rm.compute_strategy(1).unwrap();
        rm.observe_loss(&[10.0, 0.0]).unwrap();

        rm.compute_strategy(2).unwrap();
        rm.observe_loss(&[0.0, 1.0]).unwrap();
        assert_eq!(rm.cumulative_regrets(), &[1.0, 5.0]);

        let strategy = rm.compute_strategy(3).unwrap();
        assert!((strategy[0] - 1.0 / 6.0).abs() < 1e-12);
        assert!((strategy[1] - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_time_weighting() {
        let mut rm = RegretMatchingPlus::new(2).unwrap();
        rm.compute_strategy(1).unwrap();
        rm.observe_loss(&[1.0, 0.0]).unwrap();
        rm.compute_strategy(2).unwrap();

        // 1 * [0.5, 0.5] + 2 * [0, 1]
        assert_eq!(rm.cumulative_strategy(), &[0.5, 2.5]);
        assert_eq!(rm.average_strategy().unwrap(), vec![1.0 / 6.0, 5.0 / 6.0]);
        assert_eq!(rm.time(), 3);
    }

    #[test]
    fn test_internal_clock_ignores_caller_time() {
        let mut a = RegretMatchingPlus::new(3).unwrap();
        let mut b = RegretMatchingPlus::new(3).unwrap();
        for (i, t) in [(1, 1000), (2, 7), (3, 0)] {
            a.compute_strategy(i).unwrap();
            b.compute_strategy(t).unwrap();
            a.observe_loss(&[0.2, 0.5, 0.1]).unwrap();
            b.observe_loss(&[0.2, 0.5, 0.1]).unwrap();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_weighted_contribution() {
        let mut rm = RegretMatchingPlus::new(2).unwrap();
        rm.compute_weighted_strategy(1, 0.5).unwrap();
        rm.compute_weighted_strategy(2, 0.25).unwrap();
        // 1 * 0.5 * 0.5 + 2 * 0.25 * 0.5
        assert_eq!(rm.cumulative_strategy(), &[0.5, 0.5]);
    }

    #[test]
    fn test_reset_restores_time() {
        let mut rm = RegretMatchingPlus::new(4).unwrap();
        for t in 1..=5 {
            rm.compute_strategy(t).unwrap();
            rm.observe_loss(&[0.0, 1.0, 0.5, 0.25]).unwrap();
        }
        rm.reset();
        assert_eq!(rm, RegretMatchingPlus::new(4).unwrap());
        assert_eq!(rm.time(), 1);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let mut rm = RegretMatchingPlus::new(2).unwrap();
        rm.compute_strategy(1).unwrap();
        assert!(rm.observe_loss(&[1.0, 0.0, 0.0]).is_err());
        assert_eq!(rm.cumulative_regrets(), &[0.0, 0.0]);
    }
}
