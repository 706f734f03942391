//! Predictive regret matching and predictive regret matching+.
//!
//! Farina, Kroer, Sandholm, "Faster Game Solving via Predictive Blackwell
//! Approachability: Connecting Regret Matching and Mirror Descent" (2021).
//!
//! Before computing a strategy the caller may supply a forecast `m` of the
//! next loss vector. The forecast is turned into a predicted instantaneous
//! regret against the previous strategy and added to the cumulative regrets
//! before the positive-part projection:
//! ```text
//! p(a)        = <m, x_prev> - m(a)
//! Strategy(a) ∝ max(0, Regret(a) + p(a))
//! ```
//! The prediction is consumed by `compute_strategy`. Without one, the last
//! observed loss is used, which makes `p` the last instantaneous regret.

use crate::bandit::error::{BanditError, Result};
use crate::bandit::simplex;
use crate::bandit::traits::Bandit;

#[derive(Debug, Clone, PartialEq)]
struct PredictiveState {
    cumulative_regrets: Vec<f64>,
    cumulative_strategy: Vec<f64>,
    current_strategy: Vec<f64>,
    last_loss: Vec<f64>,
    prediction: Option<Vec<f64>>,
    time: u64,
    plus: bool,
}

impl PredictiveState {
    fn new(num_actions: usize, plus: bool) -> Result<Self> {
        if num_actions == 0 {
            return Err(BanditError::ZeroActions);
        }
        Ok(Self {
            cumulative_regrets: vec![0.0; num_actions],
            cumulative_strategy: vec![0.0; num_actions],
            current_strategy: simplex::uniform(num_actions),
            last_loss: vec![0.0; num_actions],
            prediction: None,
            time: 1,
            plus,
        })
    }

    fn reset(&mut self) {
        self.cumulative_regrets.fill(0.0);
        self.cumulative_strategy.fill(0.0);
        simplex::fill_uniform(&mut self.current_strategy);
        self.last_loss.fill(0.0);
        self.prediction = None;
        self.time = 1;
    }

    fn compute(&mut self, weight: f64) -> Result<&[f64]> {
        simplex::check_weight(weight)?;
        let forecast = self
            .prediction
            .take()
            .unwrap_or_else(|| self.last_loss.clone());
        let predicted_value = simplex::expected_loss(&forecast, &self.current_strategy);

        let optimistic: Vec<f64> = self
            .cumulative_regrets
            .iter()
            .zip(&forecast)
            .map(|(&r, &m)| r + predicted_value - m)
            .collect();
        simplex::regret_match(&optimistic, &mut self.current_strategy);

        let scale = if self.plus { self.time as f64 * weight } else { weight };
        for (sum, &p) in self.cumulative_strategy.iter_mut().zip(&self.current_strategy) {
            *sum += scale * p;
        }
        self.time += 1;
        Ok(&self.current_strategy)
    }

    fn observe_loss(&mut self, loss: &[f64]) -> Result<()> {
        simplex::check_vector("loss", loss, self.current_strategy.len())?;
        let v = simplex::expected_loss(loss, &self.current_strategy);

        for (regret, &l) in self.cumulative_regrets.iter_mut().zip(loss) {
            *regret += v - l;
            if self.plus {
                *regret = regret.max(0.0);
            }
        }
        self.last_loss.copy_from_slice(loss);
        Ok(())
    }

    fn observe_prediction(&mut self, prediction: &[f64]) -> Result<()> {
        simplex::check_vector("prediction", prediction, self.current_strategy.len())?;
        self.prediction = Some(prediction.to_vec());
        Ok(())
    }
}

/// Regret matching with loss forecasts.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictiveRegretMatching {
    state: PredictiveState,
}

impl PredictiveRegretMatching {
    /// Create a bandit over `num_actions` actions.
    pub fn new(num_actions: usize) -> Result<Self> {
        Ok(Self {
            state: PredictiveState::new(num_actions, false)?,
        })
    }

    /// Cumulative regret of each action.
    pub fn cumulative_regrets(&self) -> &[f64] {
        &self.state.cumulative_regrets
    }
}

/// Regret matching+ with loss forecasts.
///
/// Regrets are floored at zero and the average is linearly time-weighted by
/// an internal counter, as in [`RegretMatchingPlus`](crate::bandit::RegretMatchingPlus).
#[derive(Debug, Clone, PartialEq)]
pub struct PredictiveRegretMatchingPlus {
    state: PredictiveState,
}

impl PredictiveRegretMatchingPlus {
    /// Create a bandit over `num_actions` actions.
    pub fn new(num_actions: usize) -> Result<Self> {
        Ok(Self {
            state: PredictiveState::new(num_actions, true)?,
        })
    }

    /// Cumulative (non-negative) regret of each action.
    pub fn cumulative_regrets(&self) -> &[f64] {
        &self.state.cumulative_regrets
    }
}

macro_rules! impl_predictive_bandit {
    ($type:ty, $name:literal) => {
        impl Bandit for $type {
            fn name(&self) -> &'static str {
                $name
            }

            fn num_actions(&self) -> usize {
                self.state.current_strategy.len()
            }

            fn reset(&mut self) {
                log::trace!("resetting {}", $name);
                self.state.reset();
            }

            fn compute_weighted_strategy(&mut self, _current_time: u64, weight: f64) -> Result<&[f64]> {
                self.state.compute(weight)
            }

            fn current_strategy(&self) -> &[f64] {
                &self.state.current_strategy
            }

            fn observe_loss(&mut self, loss: &[f64]) -> Result<()> {
                self.state.observe_loss(loss)
            }

            fn uses_average_strategy(&self) -> bool {
                true
            }

            fn average_strategy(&self) -> Result<Vec<f64>> {
                Ok(simplex::normalize_or_uniform(&self.state.cumulative_strategy))
            }

            fn uses_predictions(&self) -> bool {
                true
            }

            fn observe_prediction(&mut self, prediction: &[f64]) -> Result<()> {
                self.state.observe_prediction(prediction)
            }
        }
    };
}

impl_predictive_bandit!(PredictiveRegretMatching, "predictive_regret_matching");
impl_predictive_bandit!(PredictiveRegretMatchingPlus, "predictive_regret_matching_plus");
