// 12.0 config.rs: all league settings in one place. scoring table, ranking weights, playoffs.
// 12.1 LeagueConfig is supplied once at engine construction. invalid config is fatal there.
// 12.2 loaded from TOML. every scoring weight is required; a missing field is a parse error,
// never a silent default.

use crate::engine::EngineConfig;
use crate::rankings::RankingWeights;
use crate::scoring::ScoringTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for `{field}`: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/** 12.3: playoff settings. the bracket is single elimination so the field is a power of two. */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffConfig {
    pub teams: usize,
}

impl Default for PlayoffConfig {
    fn default() -> Self {
        Self { teams: 4 }
    }
}

impl PlayoffConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.teams < 2 || !self.teams.is_power_of_two() {
            return Err(ConfigError::invalid(
                "playoffs.teams",
                format!("must be a power of two >= 2, got {}", self.teams),
            ));
        }
        Ok(())
    }
}

// The complete league configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub scoring: ScoringTable,
    #[serde(default)]
    pub ranking: RankingWeights,
    #[serde(default)]
    pub playoffs: PlayoffConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringTable::ppr(),
            ranking: RankingWeights::default(),
            playoffs: PlayoffConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl LeagueConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: LeagueConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.ranking.validate()?;
        self.playoffs.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

// Scoring format presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFormat {
    Standard,
    HalfPpr,
    Ppr,
}

impl ScoringFormat {
    pub fn config(&self) -> LeagueConfig {
        let scoring = match self {
            ScoringFormat::Standard => ScoringTable::standard(),
            ScoringFormat::HalfPpr => ScoringTable::half_ppr(),
            ScoringFormat::Ppr => ScoringTable::ppr(),
        };
        LeagueConfig {
            scoring,
            ..LeagueConfig::default()
        }
    }
}
