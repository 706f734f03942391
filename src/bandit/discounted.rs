//! Discounted regret matching.
//!
//! Brown, Sandholm, "Solving Imperfect-Information Games via Discounted
//! Regret Minimization" (2019).
//!
//! On iteration `t`, after adding the instantaneous regret:
//! - positive cumulative regrets are multiplied by `t^α / (t^α + 1)`,
//! - non-positive cumulative regrets are multiplied by `t^β / (t^β + 1)`,
//!
//! and the average strategy weights iteration `t` by `t^γ`, applied as an
//! in-place `((t-1)/t)^γ` decay of the accumulated sum so it never overflows.
//!
//! Unlike the other variants, the schedule follows the caller's
//! `current_time`, which counts from 1. A time of 0 is treated as 1.
//!
//! Special cases: `α = ∞` disables discounting of positive regrets and
//! `β = -∞` zeroes negative regrets, which gives regret matching+ regrets.

use crate::bandit::config::ConfigError;
use crate::bandit::error::{BanditError, Result};
use crate::bandit::simplex;
use crate::bandit::traits::Bandit;

/// Regret matching with polynomially discounted regrets and averages.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountedRegretMatching {
    alpha: f64,
    beta: f64,
    gamma: f64,
    cumulative_regrets: Vec<f64>,
    cumulative_strategy: Vec<f64>,
    current_strategy: Vec<f64>,
    time: u64,
}

impl DiscountedRegretMatching {
    /// Exponent on positive regrets recommended by the paper.
    pub const DEFAULT_ALPHA: f64 = 1.5;
    /// Exponent on negative regrets recommended by the paper.
    pub const DEFAULT_BETA: f64 = 0.0;
    /// Exponent on the average strategy recommended by the paper.
    pub const DEFAULT_GAMMA: f64 = 2.0;

    /// Create a bandit over `num_actions` actions with exponents `α, β, γ`.
    ///
    /// `α` and `β` may be infinite but not NaN; `γ` must be finite and
    /// non-negative.
    pub fn new(num_actions: usize, alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        if num_actions == 0 {
            return Err(BanditError::ZeroActions);
        }
        Self::validate(alpha, beta, gamma)?;
        Ok(Self {
            alpha,
            beta,
            gamma,
            cumulative_regrets: vec![0.0; num_actions],
            cumulative_strategy: vec![0.0; num_actions],
            current_strategy: simplex::uniform(num_actions),
            time: 1,
        })
    }

    /// Check the discount exponents.
    pub fn validate(alpha: f64, beta: f64, gamma: f64) -> std::result::Result<(), ConfigError> {
        if alpha.is_nan() {
            return Err(ConfigError::InvalidDiscount("alpha", alpha));
        }
        if beta.is_nan() {
            return Err(ConfigError::InvalidDiscount("beta", beta));
        }
        if !gamma.is_finite() || gamma < 0.0 {
            return Err(ConfigError::InvalidDiscount("gamma", gamma));
        }
        Ok(())
    }

    /// The `(α, β, γ)` exponents.
    pub fn exponents(&self) -> (f64, f64, f64) {
        (self.alpha, self.beta, self.gamma)
    }

    /// Cumulative (discounted) regret of each action.
    pub fn cumulative_regrets(&self) -> &[f64] {
        &self.cumulative_regrets
    }

    /// Unnormalized, discounted sum of played strategies.
    pub fn cumulative_strategy(&self) -> &[f64] {
        &self.cumulative_strategy
    }
}

/// `t^e / (t^e + 1)`, with the limits for infinite exponents.
fn regret_discount(t: f64, exponent: f64) -> f64 {
    if exponent == f64::INFINITY {
        1.0
    } else if exponent == f64::NEG_INFINITY {
        0.0
    } else {
        let p = t.powf(exponent);
        if p.is_infinite() {
            1.0
        } else {
            p / (p + 1.0)
        }
    }
}

impl Bandit for DiscountedRegretMatching {
    fn name(&self) -> &'static str {
        "discounted_regret_matching"
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

    fn compute_weighted_strategy(&mut self, current_time: u64, weight: f64) -> Result<&[f64]> {
        simplex::check_weight(weight)?;
        self.time = current_time.max(1);
        simplex::regret_match(&self.cumulative_regrets, &mut self.current_strategy);

        if self.time > 1 {
            let t = self.time as f64;
            let decay = ((t - 1.0) / t).powf(self.gamma);
            self.cumulative_strategy.iter_mut().for_each(|s| *s *= decay);
        }
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
        let t = self.time as f64;
        let positive = regret_discount(t, self.alpha);
        let negative = regret_discount(t, self.beta);

        for (regret, &l) in self.cumulative_regrets.iter_mut().zip(loss) {
            *regret += v - l;
            *regret *= if *regret > 0.0 { positive } else { negative };
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
