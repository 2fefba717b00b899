use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{Transport, TransportMap, CLASSIC_LADDERS, CLASSIC_SNAKES};
use crate::error::ConfigError;
use crate::player::{Player, DEFAULT_TICKS_PER_STEP};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Teal,
    Pink,
}

impl TokenColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            TokenColor::Red => (255, 50, 50),
            TokenColor::Blue => (50, 100, 255),
            TokenColor::Green => (50, 200, 50),
            TokenColor::Yellow => (255, 255, 100),
            TokenColor::Purple => (150, 50, 250),
            TokenColor::Orange => (255, 165, 0),
            TokenColor::Teal => (0, 175, 175),
            TokenColor::Pink => (255, 105, 180),
        }
    }
}

/// How a token is drawn. Purely cosmetic, the engine never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenShape {
    #[default]
    Circle,
    Star,
    Diamond,
}

impl TokenShape {
    pub fn glyph(self) -> &'static str {
        match self {
            TokenShape::Circle => "●",
            TokenShape::Star => "★",
            TokenShape::Diamond => "◆",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub color: TokenColor,
    #[serde(default)]
    pub token: TokenShape,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, color: TokenColor, token: TokenShape) -> Self {
        PlayerConfig {
            name: name.into(),
            color,
            token,
        }
    }
}

/// Everything fixed at startup, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub players: Vec<PlayerConfig>,
    pub snakes: Vec<Transport>,
    pub ladders: Vec<Transport>,
    /// Ticks per second of the game loop.
    pub tick_rate: u32,
    /// Ticks a token needs to move one cell.
    pub ticks_per_step: u32,
    /// Random faces shown before a roll is committed.
    pub dice_frames: u32,
    pub dice_frame_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            players: vec![
                PlayerConfig::new("Player 1", TokenColor::Red, TokenShape::Circle),
                PlayerConfig::new("Player 2", TokenColor::Blue, TokenShape::Star),
            ],
            snakes: CLASSIC_SNAKES.to_vec(),
            ladders: CLASSIC_LADDERS.to_vec(),
            tick_rate: 60,
            ticks_per_step: DEFAULT_TICKS_PER_STEP,
            dice_frames: 10,
            dice_frame_ms: 100,
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values, including the transport tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players.len()) {
            return Err(ConfigError::Validation(format!(
                "players must have between {MIN_PLAYERS} and {MAX_PLAYERS} entries, got {}",
                self.players.len()
            )));
        }
        if self.players.iter().any(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "player names must not be empty".into(),
            ));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Validation("tick_rate must be > 0".into()));
        }
        if self.ticks_per_step == 0 {
            return Err(ConfigError::Validation(
                "ticks_per_step must be > 0".into(),
            ));
        }
        self.transport_map()?;
        Ok(())
    }

    pub fn transport_map(&self) -> Result<TransportMap, ConfigError> {
        TransportMap::new(&self.snakes, &self.ladders)
    }

    pub fn build_players(&self) -> Vec<Player> {
        self.players
            .iter()
            .map(|p| Player::with_speed(p.name.clone(), p.color, self.ticks_per_step))
            .collect()
    }

    pub fn tokens(&self) -> Vec<TokenShape> {
        self.players.iter().map(|p| p.token).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.transport_map().unwrap(), TransportMap::classic());
        assert_eq!(config.tokens(), vec![TokenShape::Circle, TokenShape::Star]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml("tick_rate = 30\n").unwrap();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.ticks_per_step, DEFAULT_TICKS_PER_STEP);
    }

    #[test]
    fn test_players_from_toml() {
        let config = GameConfig::from_toml(
            r#"
[[players]]
name = "Ann"
color = "green"
token = "diamond"

[[players]]
name = "Bo"
color = "pink"

[[players]]
name = "Cy"
color = "teal"
token = "star"
"#,
        )
        .unwrap();
        assert_eq!(config.players.len(), 3);
        assert_eq!(config.players[0].token, TokenShape::Diamond);
        assert_eq!(config.players[1].token, TokenShape::Circle);
        assert_eq!(config.players[2].color, TokenColor::Teal);
        let players = config.build_players();
        assert_eq!(players[0].name(), "Ann");
        assert_eq!(players[0].ticks_per_step(), DEFAULT_TICKS_PER_STEP);
    }

    #[test]
    fn test_rejects_single_player() {
        let mut config = GameConfig::default();
        config.players.truncate(1);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let config = GameConfig {
            tick_rate: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_chained_tables() {
        let err = GameConfig::from_toml(
            r#"
snakes = [{ from = 50, to = 20 }]
ladders = [{ from = 20, to = 60 }]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ChainedTransport { .. }));
    }

    #[test]
    fn test_rejects_unknown_color() {
        let err = GameConfig::from_toml(
            r#"
[[players]]
name = "Ann"
color = "mauve"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
