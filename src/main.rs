//! Wordle Relay - Unified CLI
//!
//! Plays Wordle-style games by relaying board feedback to a solver process.

#![warn(missing_docs)]

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wordle_relay::{
    AdapterBoard, MAX_ATTEMPTS, MatchRunner, RelayConfig, SimulatedPage, SolverChannel,
    StatsStore, StopSignal,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            dictionary,
            answers,
            games,
            game,
            stats_path,
        } => run_play(&config, &dictionary, &answers, games, game, stats_path).await,
        Command::Adapters { config } => list_adapters(config.as_deref()),
        Command::Stats { stats_path } => show_stats(&stats_path),
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wordle_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Play a match on the simulated page
#[instrument(skip_all, fields(config = %config_path.display()))]
async fn run_play(
    config_path: &Path,
    dictionary: &Path,
    answers: &Path,
    games: Option<usize>,
    game: Option<String>,
    stats_path: Option<std::path::PathBuf>,
) -> Result<()> {
    let mut config = RelayConfig::from_file(config_path)?;
    if let Some(games) = games {
        config = config.with_games(games);
    }
    if let Some(game) = game {
        config = config.with_game(game);
    }
    if let Some(path) = stats_path {
        config = config.with_stats_path(path);
    }

    let adapter = config.adapter()?;
    let dictionary = read_words(dictionary)?;
    let answers = read_words(answers)?;
    info!(
        adapter = %adapter.name(),
        dictionary = dictionary.len(),
        answers = answers.len(),
        "Preparing simulated page"
    );

    let page = SimulatedPage::new(adapter.clone(), dictionary, answers)?;
    let board = AdapterBoard::new(page, adapter.clone(), config.settle_policy())
        .with_key_delay(config.key_delay());
    let solver = SolverChannel::new(config.solver().clone());

    let stop = StopSignal::new();
    let ctrl_c = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current game");
            ctrl_c.stop();
        }
    });

    let store = StatsStore::new(config.stats_path());
    let mut stats = store.load()?;

    let mut runner =
        MatchRunner::new(board, solver, adapter.url().clone()).with_stop_signal(stop);
    let report = runner.run(*config.games(), &mut stats).await?;

    store.save(&stats)?;

    println!(
        "Played {} game(s), won {} ({})",
        report.sessions().len(),
        report.wins(),
        report.end()
    );
    for session in report.sessions() {
        println!(
            "  game {}: {} after {} guess(es)",
            session.game() + 1,
            session.outcome(),
            session.attempts()
        );
    }
    Ok(())
}

/// List registered game adapters
#[instrument]
fn list_adapters(config: Option<&Path>) -> Result<()> {
    let registry = match config {
        Some(path) => RelayConfig::from_file(path)?.registry()?,
        None => wordle_relay::AdapterRegistry::builtin(),
    };

    for (id, adapter) in registry.iter() {
        let new_game = adapter.new_game_button().as_deref().unwrap_or("-");
        println!(
            "{id:<10} {:<20} {:<40} new game: {new_game}",
            adapter.name(),
            adapter.url()
        );
    }
    Ok(())
}

/// Print persisted statistics
#[instrument]
fn show_stats(path: &Path) -> Result<()> {
    let stats = StatsStore::new(path).load()?;

    println!("Games played: {}", stats.games_played());
    println!(
        "Games won:    {} ({:.1}%)",
        stats.games_won(),
        stats.win_rate()
    );
    if let Some(average) = stats.average_winning_attempts() {
        println!("Average guesses per win: {average:.2}");
    }
    for attempts in 1..=MAX_ATTEMPTS {
        println!("  {attempts} guess(es): {}", stats.wins_in(attempts));
    }
    if let Some(last) = stats.last_played() {
        println!("Last played: {}", last.to_rfc3339());
    }
    Ok(())
}

fn read_words(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read word list {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
