//! Helpers for vectors on the probability simplex.
//!
//! All bandits share the same projection and normalization rules: a vector
//! with no positive mass falls back to the uniform distribution, never to
//! NaN or an unnormalized vector.

use rand::Rng;

use crate::bandit::error::{BanditError, Result};

/// Default tolerance used when checking that a vector sums to one.
pub const TOLERANCE: f64 = 1e-9;

/// The uniform distribution over `n` actions.
pub fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

/// Overwrite `out` with the uniform distribution.
pub fn fill_uniform(out: &mut [f64]) {
    let p = 1.0 / out.len() as f64;
    out.iter_mut().for_each(|x| *x = p);
}

/// Regret matching: write the strategy proportional to positive regrets.
///
/// If no regret is positive the uniform distribution is written instead.
/// Returns `true` when the uniform fallback was taken.
///
/// Accumulators fed with huge finite losses can overflow. When they do, the
/// `+inf` regrets share all the mass; otherwise regrets are rescaled by the
/// largest one before summing. NaN entries count as non-positive.
pub fn regret_match(regrets: &[f64], out: &mut [f64]) -> bool {
    debug_assert_eq!(regrets.len(), out.len());
    let positive_sum: f64 = regrets.iter().map(|&r| r.max(0.0)).sum();

    if positive_sum == 0.0 {
        fill_uniform(out);
        return true;
    }

    if positive_sum.is_finite() {
        for (x, &r) in out.iter_mut().zip(regrets) {
            *x = r.max(0.0) / positive_sum;
        }
        return false;
    }

    let max = regrets.iter().fold(0.0, |m: f64, &r| m.max(r));
    if max == f64::INFINITY {
        let count = regrets.iter().filter(|&&r| r == f64::INFINITY).count() as f64;
        for (x, &r) in out.iter_mut().zip(regrets) {
            *x = if r == f64::INFINITY { 1.0 / count } else { 0.0 };
        }
    } else {
        let scaled_sum: f64 = regrets.iter().map(|&r| (r / max).max(0.0)).sum();
        for (x, &r) in out.iter_mut().zip(regrets) {
            *x = (r / max).max(0.0) / scaled_sum;
        }
    }
    false
}

/// Normalize non-negative weights to a distribution, uniform if they sum to 0.
pub fn normalize_or_uniform(weights: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; weights.len()];
    regret_match(weights, &mut out);
    out
}

/// Write `x_i ∝ exp(-eta * values_i)` into `out`.
///
/// Values are shifted by their minimum first so the largest exponent is 0.
/// An infinite minimum splits the mass evenly over the entries equal to it.
pub fn softmin_into(values: &[f64], eta: f64, out: &mut [f64]) {
    debug_assert_eq!(values.len(), out.len());
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if min.is_infinite() {
        let count = values.iter().filter(|&&v| v == min).count();
        if count == 0 {
            fill_uniform(out);
            return;
        }
        for (x, &v) in out.iter_mut().zip(values) {
            *x = if v == min { 1.0 / count as f64 } else { 0.0 };
        }
        return;
    }

    let mut denom = 0.0;
    for (x, &v) in out.iter_mut().zip(values) {
        *x = (-eta * (v - min)).exp();
        denom += *x;
    }

    if denom > 0.0 && denom.is_finite() {
        out.iter_mut().for_each(|x| *x /= denom);
    } else {
        fill_uniform(out);
    }
}

/// Indices whose value is within `tie` of the minimum.
///
/// Never empty for non-empty input: if no value compares (all NaN), every
/// index is returned.
pub fn argmin_set(values: &[f64], tie: f64) -> Vec<usize> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let set: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == min || v - min <= tie)
        .map(|(i, _)| i)
        .collect();
    if set.is_empty() {
        (0..values.len()).collect()
    } else {
        set
    }
}

/// Expected loss `Σ loss_i * strategy_i`.
pub fn expected_loss(loss: &[f64], strategy: &[f64]) -> f64 {
    loss.iter().zip(strategy).map(|(&l, &p)| l * p).sum()
}

/// Check that `x` is a probability distribution within `tol`.
pub fn is_distribution(x: &[f64], tol: f64) -> bool {
    !x.is_empty()
        && x.iter().all(|&p| p.is_finite() && p >= 0.0)
        && (x.iter().sum::<f64>() - 1.0).abs() <= tol
}

/// Sample an action index according to `strategy`.
pub fn sample<R: Rng + ?Sized>(strategy: &[f64], rng: &mut R) -> usize {
    let r: f64 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &prob) in strategy.iter().enumerate() {
        cumsum += prob;
        if r < cumsum {
            return i;
        }
    }

    // Rounding can leave the cumulative sum just below r.
    strategy.len() - 1
}

/// Validate a caller-supplied vector: exact length, finite entries.
pub fn check_vector(what: &'static str, v: &[f64], expected: usize) -> Result<()> {
    if v.len() != expected {
        return Err(BanditError::LengthMismatch {
            what,
            expected,
            actual: v.len(),
        });
    }
    match v.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(BanditError::NonFinite { what, index }),
        None => Ok(()),
    }
}

/// Validate an average-strategy weight.
pub fn check_weight(weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(BanditError::InvalidWeight(weight))
    }
}
