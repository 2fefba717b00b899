use std::path::PathBuf;

use crate::board::Cell;

/// Errors that can occur when loading or validating configuration.
///
/// All of these are fatal at startup: a bad transport table must never reach
/// the turn engine.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),

    #[error("{kind} {from}->{to} uses a cell outside the board (1..=100)")]
    CellOutOfRange { kind: &'static str, from: Cell, to: Cell },

    #[error("snake {from}->{to} does not go down")]
    SnakeGoesUp { from: Cell, to: Cell },

    #[error("ladder {from}->{to} does not go up")]
    LadderGoesDown { from: Cell, to: Cell },

    #[error("cell {0} is the source of more than one snake or ladder")]
    DuplicateSource(Cell),

    #[error("destination {to} of {from}->{to} is itself a snake or ladder")]
    ChainedTransport { from: Cell, to: Cell },
}

/// A move the rules refuse to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("moving {steps} from cell {position} would pass cell 100")]
    Overshoot { position: Cell, steps: u8 },
}
