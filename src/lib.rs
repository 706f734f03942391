//! # Regret Bandits
//!
//! Online learning algorithms ("bandits") used as the decision-making
//! building block of regret-minimization and repeated-game solvers.
//!
//! ## Features
//!
//! - **One Contract**: every algorithm implements the `Bandit` trait
//! - **Multiple Algorithms**: Regret Matching, RM+, Predictive RM(+),
//!   Discounted RM, Hedge, Optimistic Hedge, Follow-the-Leader, Epsilon-Greedy
//! - **Capability Flags**: average strategies, predictions and context are
//!   advertised per algorithm and fail cleanly when unsupported
//! - **Per-Decision-Point Storage**: `BanditTable` builds bandits on demand
//!   and updates them in parallel
//! - **Self-Play Validation**: matrix games with known equilibria
//!
//! ## Quick Start
//!
//! ```
//! use regret_bandits::bandit::{Bandit, BanditConfig};
//!
//! // 1. Build a bandit for a decision point with 3 actions
//! let mut bandit = BanditConfig::default().build(3).unwrap();
//!
//! // 2. Each step: get a strategy, then report the loss of every action
//! for t in 1..=10 {
//!     let strategy = bandit.compute_strategy(t).unwrap();
//!     assert_eq!(strategy.len(), 3);
//!     bandit.observe_loss(&[0.0, 1.0, 0.5]).unwrap();
//! }
//!
//! // 3. The average strategy is what converges
//! let average = bandit.average_strategy().unwrap();
//! assert!(average[0] > 0.9);
//! ```
//!
//! ## Modules
//!
//! - [`bandit`]: The `Bandit` trait, algorithms, configuration and storage
//! - [`games`]: Matrix games and a self-play driver
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Caller (solver / self-play)                 │
//! │  - Supplies losses per action     - Loops over time steps       │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ calls Bandit trait
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌─────────┐         ┌───────────┐         ┌───────────┐
//!    │ Regret  │         │   Hedge   │         │  Leader   │
//!    │Matching │         │  family   │         │  family   │
//!    └─────────┘         └───────────┘         └───────────┘
//! ```

#![warn(missing_docs)]

/// Bandit algorithms module.
///
/// This is the core module containing the `Bandit` trait and its algorithms.
pub mod bandit;

/// Game implementations module.
///
/// Contains matrix games used to validate bandits in self-play.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use bandit::{Bandit, BanditConfig, BanditError, BanditTable, Capabilities};
