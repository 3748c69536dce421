//! Engine section of the game configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use game_core::SearchBudget;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineConfigError {
    #[error("engine executable `{}` does not exist or is not a file", .0.display())]
    MissingExecutable(PathBuf),
    #[error("search depth must be at least 1")]
    ZeroDepth,
}

/// Which engine to run and how much effort it gets per move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to a UCI executable. Without one the built-in random mover plays.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Search depth sent with every `go`.
    #[serde(default = "default_depth")]
    pub depth: u8,

    /// Optional `movetime` cap in milliseconds.
    #[serde(default)]
    pub move_time_ms: Option<u64>,

    /// Sent as `setoption name <key> value <value>` after the handshake.
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

fn default_depth() -> u8 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            depth: default_depth(),
            move_time_ms: None,
            options: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Checks that the executable exists and the depth is usable.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.depth == 0 {
            return Err(EngineConfigError::ZeroDepth);
        }
        if let Some(path) = &self.path {
            if !path.is_file() {
                return Err(EngineConfigError::MissingExecutable(path.clone()));
            }
        }
        Ok(())
    }

    pub fn budget(&self) -> SearchBudget {
        let budget = SearchBudget::depth(self.depth);
        match self.move_time_ms {
            Some(ms) => budget.with_move_time(Duration::from_millis(ms)),
            None => budget,
        }
    }

    /// Option values as the text UCI expects; strings lose their quotes.
    pub fn option_values(&self) -> BTreeMap<String, String> {
        self.options
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), text)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
