//! Command-line interface for wordle_relay.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wordle Relay - plays Wordle-style games with an external solver
#[derive(Parser, Debug)]
#[command(name = "wordle_relay")]
#[command(about = "Relays Wordle board feedback to a solver process", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match on the simulated page
    Play {
        /// Path to relay configuration file
        #[arg(short, long, default_value = "relay.toml")]
        config: PathBuf,

        /// Word list the page accepts (one word per line)
        #[arg(short, long)]
        dictionary: PathBuf,

        /// Answers to play through, in order (one word per line)
        #[arg(short, long)]
        answers: PathBuf,

        /// Override the number of games
        #[arg(short, long)]
        games: Option<usize>,

        /// Override the adapter id
        #[arg(long)]
        game: Option<String>,

        /// Override the statistics file
        #[arg(long)]
        stats_path: Option<PathBuf>,
    },

    /// List registered game adapters
    Adapters {
        /// Configuration file with extra adapters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print persisted statistics
    Stats {
        /// Statistics file
        #[arg(long, default_value = "data/results.json")]
        stats_path: PathBuf,
    },
}
