//! Two-player zero-sum matrix games and bandit self-play.
//!
//! Matrix games are the simplest setting where regret minimization provably
//! finds an equilibrium: when both players run a no-regret bandit against
//! each other, their **average** strategies converge to a Nash equilibrium.
//! This makes them the standard validation target for bandit
//! implementations.
//!
//! ## Conventions
//!
//! - `payoffs[i][j]` is the payoff to the row player when row plays `i` and
//!   column plays `j`; the column player receives the negation.
//! - Bandits minimize losses, so the row player's loss for row `i` is
//!   `-(A y)_i` and the column player's loss for column `j` is `(xᵀ A)_j`.
//!
//! ## Known Equilibria
//!
//! - **Rock-paper-scissors**: uniform for both players, value 0
//! - **Matching pennies**: uniform for both players, value 0
//! - **Biased rock-paper-scissors** (rock beating scissors pays 2):
//!   `[1/4, 1/2, 1/4]` for both players, value 0

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::bandit::{Bandit, BanditConfig, BanditError, Result};

/// A two-player zero-sum game in normal form.
///
/// Deserialization goes through [`MatrixGame::new`], so a parsed game is
/// always non-empty, rectangular and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixGameData")]
pub struct MatrixGame {
    payoffs: Vec<Vec<f64>>,
}

/// Unchecked serialized form of [`MatrixGame`].
#[derive(Deserialize)]
struct MatrixGameData {
    payoffs: Vec<Vec<f64>>,
}

impl TryFrom<MatrixGameData> for MatrixGame {
    type Error = BanditError;

    fn try_from(data: MatrixGameData) -> Result<Self> {
        Self::new(data.payoffs)
    }
}

impl MatrixGame {
    /// Create a game from the row player's payoff matrix.
    ///
    /// The matrix must be non-empty, rectangular and finite.
    pub fn new(payoffs: Vec<Vec<f64>>) -> Result<Self> {
        let cols = payoffs.first().map_or(0, |row| row.len());
        if payoffs.is_empty() || cols == 0 {
            return Err(BanditError::InvalidGame("matrix is empty".to_string()));
        }
        if let Some(i) = payoffs.iter().position(|row| row.len() != cols) {
            return Err(BanditError::InvalidGame(format!(
                "row {} has {} columns, expected {}",
                i,
                payoffs[i].len(),
                cols
            )));
        }
        if payoffs.iter().flatten().any(|x| !x.is_finite()) {
            return Err(BanditError::InvalidGame("payoffs must be finite".to_string()));
        }
        Ok(Self { payoffs })
    }

    /// Rock-paper-scissors.
    pub fn rock_paper_scissors() -> Self {
        Self {
            payoffs: vec![
                vec![0.0, -1.0, 1.0],
                vec![1.0, 0.0, -1.0],
                vec![-1.0, 1.0, 0.0],
            ],
        }
    }

    /// Rock-paper-scissors where rock beating scissors pays 2.
    ///
    /// The unique equilibrium is `[1/4, 1/2, 1/4]` for both players.
    pub fn biased_rock_paper_scissors() -> Self {
        Self {
            payoffs: vec![
                vec![0.0, -1.0, 2.0],
                vec![1.0, 0.0, -1.0],
                vec![-2.0, 1.0, 0.0],
            ],
        }
    }

    /// Matching pennies.
    pub fn matching_pennies() -> Self {
        Self {
            payoffs: vec![vec![1.0, -1.0], vec![-1.0, 1.0]],
        }
    }

    /// Look up a built-in game by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "rps" | "rock_paper_scissors" => Some(Self::rock_paper_scissors()),
            "biased_rps" | "biased_rock_paper_scissors" => Some(Self::biased_rock_paper_scissors()),
            "pennies" | "matching_pennies" => Some(Self::matching_pennies()),
            _ => None,
        }
    }

    /// Number of row actions.
    pub fn num_rows(&self) -> usize {
        self.payoffs.len()
    }

    /// Number of column actions.
    pub fn num_cols(&self) -> usize {
        self.payoffs.first().map_or(0, Vec::len)
    }

    /// Row payoff of every row against column strategy `y`: `A y`.
    pub fn row_payoffs(&self, y: &[f64]) -> Vec<f64> {
        self.payoffs
            .iter()
            .map(|row| row.iter().zip(y).map(|(&a, &p)| a * p).sum())
            .collect()
    }

    /// Row payoff of every column against row strategy `x`: `xᵀ A`.
    pub fn col_payoffs(&self, x: &[f64]) -> Vec<f64> {
        (0..self.num_cols())
            .map(|j| self.payoffs.iter().zip(x).map(|(row, &p)| row[j] * p).sum())
            .collect()
    }

    /// Losses of the row player's actions against `y`.
    pub fn row_losses(&self, y: &[f64]) -> Vec<f64> {
        self.row_payoffs(y).into_iter().map(|v| -v).collect()
    }

    /// Losses of the column player's actions against `x`.
    pub fn col_losses(&self, x: &[f64]) -> Vec<f64> {
        self.col_payoffs(x)
    }

    /// Expected row payoff `xᵀ A y`.
    pub fn value(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter().zip(self.row_payoffs(y)).map(|(&p, v)| p * v).sum()
    }

    /// Duality gap of `(x, y)`: how much both players gain by best responding.
    ///
    /// Zero exactly at a Nash equilibrium, positive otherwise.
    pub fn exploitability(&self, x: &[f64], y: &[f64]) -> f64 {
        let best_row = self
            .row_payoffs(y)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        let best_col = self
            .col_payoffs(x)
            .into_iter()
            .fold(f64::INFINITY, f64::min);
        best_row - best_col
    }
}

/// Statistics tracked during self-play.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfPlayStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Exploitability of the average strategies.
    pub exploitability: f64,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,
}

impl SelfPlayStats {
    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }
}

/// Both players of a matrix game run a bandit against each other.
///
/// # Example
/// ```
/// use regret_bandits::bandit::BanditConfig;
/// use regret_bandits::games::matrix::{MatrixGame, SelfPlay};
///
/// let game = MatrixGame::biased_rock_paper_scissors();
/// let mut selfplay = SelfPlay::new(game, &BanditConfig::regret_matching_plus()).unwrap();
/// let stats = selfplay.train(2_000).unwrap();
/// assert!(stats.exploitability < 0.05);
/// ```
#[derive(Debug)]
pub struct SelfPlay {
    game: MatrixGame,
    row: Box<dyn Bandit>,
    col: Box<dyn Bandit>,
    iteration: u64,
    stats: SelfPlayStats,
}

impl SelfPlay {
    /// Create a self-play run with both players using `config`.
    pub fn new(game: MatrixGame, config: &BanditConfig) -> Result<Self> {
        let row = config.build(game.num_rows())?;
        let col = config.build(game.num_cols())?;
        Self::with_bandits(game, row, col)
    }

    /// Create a self-play run with explicit bandits for each player.
    pub fn with_bandits(game: MatrixGame, row: Box<dyn Bandit>, col: Box<dyn Bandit>) -> Result<Self> {
        for (bandit, expected) in [(&row, game.num_rows()), (&col, game.num_cols())] {
            if bandit.num_actions() != expected {
                return Err(BanditError::LengthMismatch {
                    what: "bandit actions",
                    expected,
                    actual: bandit.num_actions(),
                });
            }
        }
        Ok(Self {
            game,
            row,
            col,
            iteration: 0,
            stats: SelfPlayStats::default(),
        })
    }

    /// Run a single simultaneous-move iteration.
    pub fn run_iteration(&mut self) -> Result<()> {
        self.iteration += 1;
        let t = self.iteration;

        // Optimistic forecast: the losses the opponent's last strategy produced.
        if self.row.uses_predictions() {
            let forecast = self.game.row_losses(self.col.current_strategy());
            self.row.observe_prediction(&forecast)?;
        }
        if self.col.uses_predictions() {
            let forecast = self.game.col_losses(self.row.current_strategy());
            self.col.observe_prediction(&forecast)?;
        }

        let x = self.row.compute_strategy(t)?.to_vec();
        let y = self.col.compute_strategy(t)?.to_vec();

        self.row.observe_loss(&self.game.row_losses(&y))?;
        self.col.observe_loss(&self.game.col_losses(&x))?;
        Ok(())
    }

    /// Train for a number of iterations.
    pub fn train(&mut self, iterations: u64) -> Result<&SelfPlayStats> {
        self.train_with_callback(iterations, u64::MAX, |_| {})
    }

    /// Train with a callback every `callback_interval` iterations.
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> Result<&SelfPlayStats>
    where
        F: FnMut(&SelfPlayStats),
    {
        let start_time = Instant::now();
        let interval = callback_interval.max(1);
        log::info!(
            "beginning self-play ({} vs {}, {} iterations)",
            self.row.name(),
            self.col.name(),
            iterations
        );

        for i in 0..iterations {
            self.run_iteration()?;

            if (i + 1) % interval == 0 {
                self.update_stats(start_time)?;
                callback(&self.stats);
            }
        }

        self.update_stats(start_time)?;
        log::info!(
            "finished self-play at iteration {} (exploitability {:.6})",
            self.iteration,
            self.stats.exploitability
        );
        Ok(&self.stats)
    }

    fn update_stats(&mut self, start_time: Instant) -> Result<()> {
        self.stats.iterations = self.iteration;
        self.stats.exploitability = self.exploitability()?;
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
        Ok(())
    }

    /// Average strategies of the row and column players.
    ///
    /// Players without an average strategy report their current one.
    pub fn average_strategies(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        Ok((average_or_current(self.row.as_ref())?, average_or_current(self.col.as_ref())?))
    }

    /// Exploitability of the average strategies.
    pub fn exploitability(&self) -> Result<f64> {
        let (x, y) = self.average_strategies()?;
        Ok(self.game.exploitability(&x, &y))
    }

    /// Reset both players to their constructed state.
    pub fn reset(&mut self) {
        self.row.reset();
        self.col.reset();
        self.iteration = 0;
        self.stats = SelfPlayStats::default();
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get current statistics.
    pub fn stats(&self) -> &SelfPlayStats {
        &self.stats
    }

    /// Get reference to the game.
    pub fn game(&self) -> &MatrixGame {
        &self.game
    }

    /// The row player's bandit.
    pub fn row(&self) -> &dyn Bandit {
        self.row.as_ref()
    }

    /// The column player's bandit.
    pub fn col(&self) -> &dyn Bandit {
        self.col.as_ref()
    }
}

fn average_or_current(bandit: &dyn Bandit) -> Result<Vec<f64>> {
    if bandit.uses_average_strategy() {
        bandit.average_strategy()
    } else {
        Ok(bandit.current_strategy().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bandit::{simplex, RegretMatching};

    #[test]
    fn test_invalid_matrices() {
        assert!(MatrixGame::new(vec![]).is_err());
        assert!(MatrixGame::new(vec![vec![]]).is_err());
        assert!(matches!(
            MatrixGame::new(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(BanditError::InvalidGame(_))
        ));
        assert!(MatrixGame::new(vec![vec![f64::NAN]]).is_err());
        assert!(MatrixGame::new(vec![vec![1.0, 2.0, 3.0]]).is_ok());
    }

    #[test]
    fn test_json_goes_through_validation() {
        assert!(serde_json::from_str::<MatrixGame>(r#"{"payoffs": []}"#).is_err());
        assert!(serde_json::from_str::<MatrixGame>(r#"{"payoffs": [[]]}"#).is_err());
        assert!(serde_json::from_str::<MatrixGame>(r#"{"payoffs": [[1.0, 2.0], [3.0]]}"#).is_err());

        let game = MatrixGame::biased_rock_paper_scissors();
        let json = serde_json::to_string(&game).unwrap();
        let parsed: MatrixGame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, game);
        assert_eq!(parsed.num_cols(), 3);
    }

    #[test]
    fn test_losses_and_value() {
        let game = MatrixGame::rock_paper_scissors();
        let rock = [1.0, 0.0, 0.0];
        // Against rock: rock ties, paper wins, scissors loses.
        assert_eq!(game.row_losses(&rock), vec![0.0, -1.0, 1.0]);
        assert_eq!(game.col_losses(&rock), vec![0.0, -1.0, 1.0]);
        assert_eq!(game.value(&rock, &[0.0, 1.0, 0.0]), -1.0);
    }

    #[test]
    fn test_exploitability() {
        let game = MatrixGame::rock_paper_scissors();
        let uniform = simplex::uniform(3);
        assert!(game.exploitability(&uniform, &uniform).abs() < 1e-12);
        assert_eq!(game.exploitability(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]), 2.0);
    }

    #[test]
    fn test_biased_rps_equilibrium() {
        let game = MatrixGame::biased_rock_paper_scissors();
        let x = [0.25, 0.5, 0.25];
        // The game is symmetric, so the same strategy is optimal for both.
        assert!(game.exploitability(&x, &x).abs() < 1e-12);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(MatrixGame::by_name("rps"), Some(MatrixGame::rock_paper_scissors()));
        assert_eq!(MatrixGame::by_name("pennies"), Some(MatrixGame::matching_pennies()));
        assert!(MatrixGame::by_name("chess").is_none());
    }

    #[test]
    fn test_regret_minimizers_converge() {
        let configs = [
            BanditConfig::regret_matching(),
            BanditConfig::regret_matching_plus(),
            BanditConfig::PredictiveRegretMatching,
            BanditConfig::PredictiveRegretMatchingPlus,
            BanditConfig::discounted(1.5, 0.0, 2.0),
            BanditConfig::hedge(0.1),
            BanditConfig::optimistic_hedge(0.1),
        ];
        for config in configs {
            for game in [MatrixGame::rock_paper_scissors(), MatrixGame::biased_rock_paper_scissors()] {
                let mut selfplay = SelfPlay::new(game, &config).unwrap();
                let stats = selfplay.train(5_000).unwrap();
                assert!(
                    stats.exploitability < 0.05,
                    "{:?}: exploitability {}",
                    config,
                    stats.exploitability
                );
            }
        }
    }

    #[test]
    fn test_callback_interval() {
        let mut selfplay =
            SelfPlay::new(MatrixGame::matching_pennies(), &BanditConfig::default()).unwrap();
        let mut seen = Vec::new();
        selfplay
            .train_with_callback(100, 25, |stats| seen.push(stats.iterations))
            .unwrap();
        assert_eq!(seen, vec![25, 50, 75, 100]);
        assert_eq!(selfplay.iteration(), 100);
    }

    #[test]
    fn test_reset_replays() {
        let mut selfplay =
            SelfPlay::new(MatrixGame::biased_rock_paper_scissors(), &BanditConfig::default()).unwrap();
        selfplay.train(200).unwrap();
        let first = selfplay.average_strategies().unwrap();

        selfplay.reset();
        assert_eq!(selfplay.iteration(), 0);
        assert_eq!(selfplay.row().current_strategy(), simplex::uniform(3).as_slice());

        selfplay.train(200).unwrap();
        assert_eq!(selfplay.average_strategies().unwrap(), first);
    }

    #[test]
    fn test_mismatched_bandits_rejected() {
        let game = MatrixGame::matching_pennies();
        let row = Box::new(RegretMatching::new(3).unwrap());
        let col = Box::new(RegretMatching::new(2).unwrap());
        assert!(matches!(
            SelfPlay::with_bandits(game, row, col),
            Err(BanditError::LengthMismatch { expected: 2, actual: 3, .. })
        ));
    }
}
