//! Game settings: a TOML file, then command-line overrides.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use game_core::{BoardOrientation, Color, Position, PositionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uci_client::{EngineConfig, EngineConfigError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Engine(#[from] EngineConfigError),
    #[error("invalid start position: {0}")]
    StartPosition(#[from] PositionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Which side is drawn at the bottom; `auto` follows the human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Auto,
    White,
    Black,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub human_side: Side,

    #[serde(default)]
    pub orientation: Orientation,

    /// FEN to start from instead of the standard position.
    #[serde(default)]
    pub start_fen: Option<String>,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Values given on the command line; each one replaces the file's.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub side: Option<Side>,
    pub engine: Option<PathBuf>,
    pub depth: Option<u8>,
    pub fen: Option<String>,
}

impl GameConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// The file's settings (or defaults without one) with `overrides` applied,
    /// validated.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(side) = overrides.side {
            self.human_side = side;
        }
        if let Some(path) = overrides.engine {
            self.engine.path = Some(path);
        }
        if let Some(depth) = overrides.depth {
            self.engine.depth = depth;
        }
        if let Some(fen) = overrides.fen {
            self.start_fen = Some(fen);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.start_position()?;
        Ok(())
    }

    pub fn human_color(&self) -> Color {
        self.human_side.into()
    }

    pub fn start_position(&self) -> Result<Position, PositionError> {
        match &self.start_fen {
            Some(fen) => Position::from_fen(fen),
            None => Ok(Position::startpos()),
        }
    }

    pub fn board_orientation(&self) -> BoardOrientation {
        match self.orientation {
            Orientation::Auto => BoardOrientation::for_side(self.human_color()),
            Orientation::White => BoardOrientation::WhiteAtBottom,
            Orientation::Black => BoardOrientation::BlackAtBottom,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
