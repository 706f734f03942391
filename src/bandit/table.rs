//! Storage for one bandit per decision point.
//!
//! Solvers run an independent bandit at every information set. This table
//! owns those bandits, keyed by a decision point string, and builds new ones
//! on demand from a single [`BanditConfig`].

use std::collections::hash_map::Entry;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bandit::config::BanditConfig;
use crate::bandit::error::{BanditError, Result};
use crate::bandit::simplex;
use crate::bandit::traits::Bandit;

/// Bandits keyed by decision point.
///
/// Each bandit is independent, so [`par_for_each_mut`](Self::par_for_each_mut)
/// can update all of them in parallel without locking.
#[derive(Debug)]
pub struct BanditTable {
    /// Algorithm used for every new decision point.
    config: BanditConfig,

    /// Bandits: key -> bandit
    bandits: FxHashMap<String, Box<dyn Bandit>>,
}

impl BanditTable {
    /// Create an empty table building bandits from `config`.
    pub fn new(config: BanditConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bandits: FxHashMap::default(),
        })
    }

    /// Create a table with pre-allocated capacity.
    pub fn with_capacity(config: BanditConfig, capacity: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bandits: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        })
    }

    /// The config new bandits are built from.
    pub fn config(&self) -> &BanditConfig {
        &self.config
    }

    /// Get the bandit for `key`, building it on first visit.
    ///
    /// # Errors
    /// `ActionCountMismatch` if `key` was first seen with a different number
    /// of actions, `ZeroActions` if `num_actions` is 0.
    pub fn get_or_insert(&mut self, key: &str, num_actions: usize) -> Result<&mut dyn Bandit> {
        let bandit = match self.bandits.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let bandit = self.config.build(num_actions)?;
                log::debug!("new decision point '{}' with {} actions", key, num_actions);
                entry.insert(bandit)
            }
        };

        // Verify action count consistency
        if bandit.num_actions() != num_actions {
            return Err(BanditError::ActionCountMismatch {
                key: key.to_string(),
                expected: bandit.num_actions(),
                actual: num_actions,
            });
        }
        Ok(bandit.as_mut())
    }

    /// The bandit for `key`, if it has been visited.
    pub fn get(&self, key: &str) -> Option<&dyn Bandit> {
        self.bandits.get(key).map(|b| b.as_ref())
    }

    /// Check if a decision point exists.
    pub fn contains(&self, key: &str) -> bool {
        self.bandits.contains_key(key)
    }

    /// Number of decision points.
    pub fn len(&self) -> usize {
        self.bandits.len()
    }

    /// Whether no decision point has been visited.
    pub fn is_empty(&self) -> bool {
        self.bandits.is_empty()
    }

    /// All decision point keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.bandits.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Get the average strategy for a decision point.
    ///
    /// Unseen decision points are uniform. Algorithms without an average
    /// strategy report their current strategy.
    pub fn average_strategy(&self, key: &str, num_actions: usize) -> Vec<f64> {
        match self.bandits.get(key) {
            Some(bandit) => bandit
                .average_strategy()
                .unwrap_or_else(|_| bandit.current_strategy().to_vec()),
            None => simplex::uniform(num_actions),
        }
    }

    /// Apply `f` to every bandit in parallel.
    ///
    /// Stops at the first error returned by `f`.
    pub fn par_for_each_mut<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(&str, &mut dyn Bandit) -> Result<()> + Sync,
    {
        self.bandits
            .par_iter_mut()
            .try_for_each(|(key, bandit)| f(key.as_str(), bandit.as_mut()))
    }

    /// Reset every bandit, keeping the decision points.
    pub fn reset_all(&mut self) {
        self.bandits.values_mut().for_each(|b| b.reset());
    }

    /// Remove every decision point.
    pub fn clear(&mut self) {
        self.bandits.clear();
    }

    /// Snapshot the average strategy of every decision point.
    pub fn snapshot(&self) -> StrategySnapshot {
        let strategies = self
            .bandits
            .iter()
            .map(|(key, bandit)| (key.clone(), self.average_strategy(key, bandit.num_actions())))
            .collect();
        StrategySnapshot {
            algorithm: self.config,
            strategies,
        }
    }

    /// Convergence indicator: how much average strategies moved since `snapshot`.
    ///
    /// Formula: `100 * mean(sum |new - old|)` over decision points. Points
    /// added since the snapshot are compared against uniform. Returns
    /// `f64::INFINITY` when the table is empty.
    pub fn strategy_change(&self, snapshot: &StrategySnapshot) -> f64 {
        if self.bandits.is_empty() {
            return f64::INFINITY;
        }

        let total_change: f64 = self
            .bandits
            .iter()
            .map(|(key, bandit)| {
                let n = bandit.num_actions();
                let new = self.average_strategy(key, n);
                let old = snapshot
                    .strategies
                    .get(key)
                    .filter(|old| old.len() == n)
                    .cloned()
                    .unwrap_or_else(|| simplex::uniform(n));
                new.iter().zip(&old).map(|(a, b)| (a - b).abs()).sum::<f64>()
            })
            .sum();

        100.0 * total_change / self.bandits.len() as f64
    }
}

/// Serializable average strategies for every decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySnapshot {
    /// Algorithm that produced the strategies.
    pub algorithm: BanditConfig,
    /// Average strategies: key -> [probability per action]
    pub strategies: FxHashMap<String, Vec<f64>>,
}

impl StrategySnapshot {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
