use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snakeladder::cli::Cli;
use snakeladder::input::Input;
use snakeladder::ui::Game;
use snakeladder::{GameConfig, TurnEngine};

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            // the board owns stdout, keep stderr quiet unless asked
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    // a bad config stops us before the terminal is touched
    let config = GameConfig::load_or_default(&cli.config)?;
    let transports = config.transport_map()?;
    info!(
        players = config.players.len(),
        snakes = config.snakes.len(),
        ladders = config.ladders.len(),
        "configuration loaded"
    );

    let players = config.build_players();
    let engine = match cli.seed {
        Some(seed) => TurnEngine::seeded(players, transports, seed),
        None => TurnEngine::new(players, transports),
    };
    let mut game = Game::new(engine, &config, Input::from_stdin());
    game.play().context("terminal error")?;

    if let Some(winner) = game.engine().winner() {
        println!("{} won!", winner.name());
    }
    Ok(())
}
