//! Matrix game self-play binary.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [GAME] [ITERATIONS] [CONFIG]
//!
//! Arguments:
//!   GAME          rps, biased_rps or pennies (default: rps)
//!   ITERATIONS    Number of iterations (default: 10000)
//!   CONFIG        Bandit configuration JSON file (default: regret matching+)
//!
//! Set `RUST_LOG=debug` for bandit construction logs.

use std::env;
use std::fs;
use std::process;

use indicatif::ProgressBar;
use serde_json::json;

use regret_bandits::bandit::BanditConfig;
use regret_bandits::games::matrix::{MatrixGame, SelfPlay};

const DEFAULT_ITERATIONS: u64 = 10_000;
const PROGRESS_INTERVAL: u64 = 100;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let game_name = args.first().map(String::as_str).unwrap_or("rps");
    let game = MatrixGame::by_name(game_name).ok_or_else(|| format!("unknown game '{}'", game_name))?;

    let iterations = match args.get(1) {
        Some(s) => s.parse::<u64>().map_err(|e| format!("invalid iterations '{}': {}", s, e))?,
        None => DEFAULT_ITERATIONS,
    };

    let config = match args.get(2) {
        Some(path) => load_config(path)?,
        None => BanditConfig::default(),
    };
    config.validate().map_err(|e| e.to_string())?;

    println!("=================================================");
    println!("  Bandit Self-Play");
    println!("=================================================");
    println!("Game: {} ({}x{})", game_name, game.num_rows(), game.num_cols());
    println!("Iterations: {}", iterations);
    println!("Config: {:?}", config);
    println!();

    let mut selfplay = SelfPlay::new(game, &config).map_err(|e| e.to_string())?;

    let progress = ProgressBar::new(iterations);
    let stats = selfplay
        .train_with_callback(iterations, PROGRESS_INTERVAL, |stats| {
            progress.set_position(stats.iterations);
            progress.set_message(format!("gap {:.6}", stats.exploitability));
        })
        .map_err(|e| e.to_string())?
        .clone();
    progress.finish();

    let (row, col) = selfplay.average_strategies().map_err(|e| e.to_string())?;

    println!();
    println!("Exploitability: {:.6}", stats.exploitability);
    println!("Speed: {:.0} it/s", stats.iterations_per_second);
    println!();

    let summary = json!({
        "game": game_name,
        "config": config,
        "stats": stats,
        "row_strategy": row,
        "col_strategy": col,
    });
    let pretty = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{}", pretty);
    Ok(())
}

fn load_config(path: &str) -> Result<BanditConfig, String> {
    log::info!("loading configuration from {}", path);
    let content = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid config {}: {}", path, e))
}

fn print_help() {
    println!("Matrix game self-play");
    println!();
    println!("Usage: selfplay [GAME] [ITERATIONS] [CONFIG]");
    println!();
    println!("Arguments:");
    println!("  GAME          rps, biased_rps or pennies (default: rps)");
    println!("  ITERATIONS    Number of iterations (default: {})", DEFAULT_ITERATIONS);
    println!("  CONFIG        Bandit configuration JSON file (default: regret matching+)");
    println!();
    println!("Example config:");
    println!("  {{\"algorithm\": \"discounted_regret_matching\", \"alpha\": 1.5, \"beta\": 0.0, \"gamma\": 2.0}}");
}
