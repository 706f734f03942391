//! Online learning bandits.
//!
//! This module provides the [`Bandit`] trait and the algorithms that
//! implement it. A bandit emits a strategy (a probability distribution over a
//! fixed set of actions) each time step, receives the loss of every action,
//! and updates itself so that its regret grows sublinearly.
//!
//! # Supported Algorithms
//!
//! - **Regret Matching**: strategy proportional to positive cumulative regret
//! - **Regret Matching+**: regrets floored at zero, linearly weighted average
//! - **Predictive Regret Matching(+)**: adds a forecast of the next loss
//! - **Discounted Regret Matching**: polynomial discounting with `α, β, γ`
//! - **Hedge / Optimistic Hedge**: exponential weights over cumulative loss
//! - **Follow-the-Leader / Epsilon-Greedy**: play the empirical best action
//!
//! # Usage
//!
//! ```
//! use regret_bandits::bandit::{Bandit, BanditConfig};
//!
//! let mut bandit = BanditConfig::regret_matching_plus().build(3).unwrap();
//! for t in 1..=100 {
//!     let strategy = bandit.compute_strategy(t).unwrap();
//!     assert_eq!(strategy.len(), 3);
//!     // Action 2 is always best.
//!     bandit.observe_loss(&[1.0, 0.5, 0.0]).unwrap();
//! }
//! let average = bandit.average_strategy().unwrap();
//! assert!(average[2] > 0.9);
//! ```
//!
//! # Theory
//!
//! **Regret** of action `a` after `T` steps: the loss actually incurred by
//! the played mixed strategies minus the loss `a` would have incurred.
//! ```text
//! Regret(a) = Σ_t <loss_t, x_t> - loss_t(a)
//! ```
//! For regret-minimizing bandits in self-play, the **average** strategy
//! converges to a Nash equilibrium of two-player zero-sum games.
//!
//! # References
//!
//! - Hart, S., Mas-Colell, A. "A Simple Adaptive Procedure Leading to Correlated Equilibrium" (2000)
//! - Tammelin, O. "Solving Large Imperfect Information Games Using CFR+" (2014)
//! - Brown, N., Sandholm, T. "Solving Imperfect-Information Games via Discounted Regret Minimization" (2019)
//! - Farina, G., Kroer, C., Sandholm, T. "Faster Game Solving via Predictive Blackwell Approachability" (2021)
//! - Syrgkanis, V., et al. "Fast Convergence of Regularized Learning in Games" (2015)

pub mod config;
pub mod discounted;
pub mod error;
pub mod greedy;
pub mod hedge;
pub mod predictive;
pub mod regret_matching;
pub mod regret_matching_plus;
pub mod simplex;
pub mod table;
pub mod traits;

// Re-export main types for convenient access
pub use config::{BanditConfig, ConfigError};
pub use discounted::DiscountedRegretMatching;
pub use error::{BanditError, Result};
pub use greedy::{EpsGreedy, FollowTheLeader};
pub use hedge::{Hedge, OptimisticHedge};
pub use predictive::{PredictiveRegretMatching, PredictiveRegretMatchingPlus};
pub use regret_matching::RegretMatching;
pub use regret_matching_plus::RegretMatchingPlus;
pub use table::{BanditTable, StrategySnapshot};
pub use traits::{Bandit, Capabilities};
