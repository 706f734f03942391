//! Games for driving bandits.
//!
//! The bandits in this crate are building blocks: a solver calls one per
//! decision point and feeds it losses computed from game outcomes. The games
//! here are that caller, in the smallest form that still has a known answer,
//! and serve as:
//!
//! 1. **Validation**: games with known Nash equilibria check that every
//!    regret minimizer's average strategy converges.
//!
//! 2. **Examples**: they show the per-step protocol a solver follows.
//!
//! 3. **Benchmarks**: standard workloads for performance testing.
//!
//! ## Available Games
//!
//! - [`matrix`]: Two-player zero-sum matrix games (rock-paper-scissors,
//!   matching pennies) with a bandit self-play driver

pub mod matrix;
