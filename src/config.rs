//! External engine settings and the difficulty presets.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the engine executable.
pub const ENGINE_PATH_VAR: &str = "CHESS_ENGINE_PATH";
pub const DEFAULT_ENGINE_PATH: &str = "stockfish";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// How to start and drive a UCI engine. Depth and move time are passed
/// through as advisory budgets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub path: String,
    pub depth: u32,
    pub movetime_ms: u64,
    /// Sent as `UCI_LimitStrength` + `UCI_Elo` when set.
    pub elo: Option<u32>,
    /// Sent as `Skill Level` when set and no Elo is given.
    pub skill_level: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

impl EngineConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (depth, movetime_ms, elo, skill_level) = match difficulty {
            Difficulty::Easy => (2, 100, Some(1350), None),
            Difficulty::Medium => (5, 500, Some(2000), None),
            Difficulty::Hard => (10, 1000, None, Some(20)),
        };
        EngineConfig {
            path: engine_path(env::var(ENGINE_PATH_VAR).ok()),
            depth,
            movetime_ms,
            elo,
            skill_level,
        }
    }

    /// Parse a JSON config. Missing fields take the medium preset.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn movetime(&self) -> Duration {
        Duration::from_millis(self.movetime_ms)
    }

    /// `setoption` commands to send after the handshake.
    pub fn uci_options(&self) -> Vec<String> {
        match (self.elo, self.skill_level) {
            (Some(elo), _) => vec![
                "setoption name UCI_LimitStrength value true".to_string(),
                format!("setoption name UCI_Elo value {elo}"),
            ],
            (None, Some(level)) => vec![format!("setoption name Skill Level value {level}")],
            (None, None) => Vec::new(),
        }
    }

    pub fn go_command(&self) -> String {
        format!("go depth {} movetime {}", self.depth, self.movetime_ms)
    }
}

fn engine_path(var: Option<String>) -> String {
    var.filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENGINE_PATH.to_string())
}
