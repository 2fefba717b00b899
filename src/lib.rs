//! Two-player Snake and Ladder for the terminal.
//!
//! The rules live in [`board`], [`player`] and [`engine`]; [`ui`] draws the
//! engine's state and feeds it key presses at a fixed tick rate.

pub mod board;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod player;
pub mod terminal;
pub mod ui;

pub use board::{cell_to_coordinates, Cell, Coordinates, Transport, TransportMap};
pub use config::{GameConfig, PlayerConfig, TokenColor, TokenShape};
pub use engine::{Command, GamePhase, TurnEngine, TurnState};
pub use error::{ConfigError, MoveError};
pub use player::Player;
