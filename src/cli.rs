//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

/// Snake and Ladder in the terminal
#[derive(Parser, Debug)]
#[command(name = "snakeladder")]
#[command(about = "Two-player Snake and Ladder for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Game configuration (players, snakes, ladders, speeds). Defaults are
    /// used when the file does not exist.
    #[arg(short, long, default_value = "snakeladder.toml")]
    pub config: PathBuf,

    /// Seed for the dice, for a repeatable game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
