use serde::{Deserialize, Serialize};

use crate::ai::search::MAX_DEPTH;
use crate::board::Side;
use crate::error::ConfigError;

/// Search parameters. Missing fields fall back to the defaults when
/// deserialized from a partial JS object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched from the root, the root move included.
    pub max_depth: u8,
    /// Alpha-beta cutoffs. Disabling yields the same values with more nodes.
    pub pruning: bool,
}

impl SearchConfig {
    /// Accepts depths in `1..=MAX_DEPTH`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if (1..=MAX_DEPTH).contains(&self.max_depth) {
            Ok(self)
        } else {
            Err(ConfigError::DepthOutOfRange {
                depth: self.max_depth,
                max: MAX_DEPTH,
            })
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            pruning: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side played by the engine; `None` for two human players.
    pub computer_side: Option<Side>,
    pub search: SearchConfig,
}

impl GameConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        self.search.validate()?;
        Ok(self)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            computer_side: Some(Side::White),
            search: SearchConfig::default(),
        }
    }
}
