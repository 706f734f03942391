//! The `Bandit` trait shared by every online learning algorithm.
//!
//! A bandit is a small state machine over a fixed set of actions. Each time
//! step the caller asks it for a strategy, evaluates that strategy, and
//! reports back a loss for every action. Algorithms differ only in their
//! accumulators and update rules, so solvers can swap them freely.

use std::fmt::Debug;

use crate::bandit::error::{BanditError, Result};

/// Which optional operations a bandit supports.
///
/// These are fixed per algorithm. Callers can branch on the descriptor
/// instead of calling a gated operation and handling `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// `average_strategy` is available.
    pub average_strategy: bool,
    /// `observe_prediction` is consumed before `compute_strategy`.
    pub predictions: bool,
    /// `observe_context` is consumed before predictions and strategies.
    pub context: bool,
}

/// The interface every online learning algorithm implements.
///
/// # Protocol
///
/// Per time step `t` the caller:
/// 1. calls `observe_context` if `uses_context()`,
/// 2. calls `observe_prediction` if `uses_predictions()` and it has a forecast,
/// 3. calls `compute_strategy(t)` and acts on the returned distribution,
/// 4. calls `observe_loss` with one loss per action for that distribution.
///
/// `reset` may be called at any point to return to the constructed state.
///
/// # Example
/// ```
/// use regret_bandits::bandit::{Bandit, RegretMatching};
///
/// let mut bandit = RegretMatching::new(2).unwrap();
/// assert_eq!(bandit.compute_strategy(1).unwrap(), &[0.5, 0.5]);
///
/// bandit.observe_loss(&[1.0, 0.0]).unwrap();
/// assert_eq!(bandit.compute_strategy(2).unwrap(), &[0.0, 1.0]);
/// ```
pub trait Bandit: Debug + Send {
    /// Short algorithm name, used in errors and logs.
    fn name(&self) -> &'static str;

    /// Number of actions, fixed at construction.
    fn num_actions(&self) -> usize;

    /// Restore the state the bandit had right after construction.
    fn reset(&mut self);

    /// Compute and store this step's strategy.
    ///
    /// `current_time` is the caller's step counter. `weight` scales this
    /// step's contribution to the average strategy (e.g. a reach
    /// probability) and must be finite and non-negative.
    fn compute_weighted_strategy(&mut self, current_time: u64, weight: f64) -> Result<&[f64]>;

    /// `compute_weighted_strategy` with a weight of 1.
    fn compute_strategy(&mut self, current_time: u64) -> Result<&[f64]> {
        self.compute_weighted_strategy(current_time, 1.0)
    }

    /// The strategy returned by the last `compute_*` call, uniform before any.
    fn current_strategy(&self) -> &[f64];

    /// Update the accumulators with the loss of every action under the
    /// current strategy. `loss` must have exactly `num_actions` finite entries.
    fn observe_loss(&mut self, loss: &[f64]) -> Result<()>;

    /// Whether `average_strategy` is supported.
    fn uses_average_strategy(&self) -> bool {
        false
    }

    /// The (weighted) time average of all computed strategies.
    fn average_strategy(&self) -> Result<Vec<f64>> {
        Err(BanditError::unsupported(self.name(), "average_strategy"))
    }

    /// Whether `observe_prediction` is consumed by this algorithm.
    fn uses_predictions(&self) -> bool {
        false
    }

    /// Provide a forecast of the next loss vector.
    fn observe_prediction(&mut self, _prediction: &[f64]) -> Result<()> {
        Err(BanditError::unsupported(self.name(), "observe_prediction"))
    }

    /// Whether `observe_context` is consumed by this algorithm.
    fn uses_context(&self) -> bool {
        false
    }

    /// Provide side information for the next step.
    fn observe_context(&mut self, _context: &[f64]) -> Result<()> {
        Err(BanditError::unsupported(self.name(), "observe_context"))
    }

    /// All capability flags at once.
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            average_strategy: self.uses_average_strategy(),
            predictions: self.uses_predictions(),
            context: self.uses_context(),
        }
    }
}
