//! Configuration loading for Decree.
//!
//! Reads `~/.decree/config.toml`. Every section is optional:
//!
//! ```toml
//! [engine]
//! max_outcomes = 8
//! max_actions_per_intent = 256
//!
//! [ledger]
//! path = "${HOME}/.decree/ledger.json"
//!
//! [log]
//! filter = "info"
//! ```

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MAX_OUTCOMES: u32 = 8;
pub const DEFAULT_MAX_ACTIONS_PER_INTENT: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config at {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecreeConfig {
    pub engine: EngineConfig,
    pub ledger: LedgerConfig,
    pub log: LogConfig,
}

/// Registration limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_outcomes: u32,
    pub max_actions_per_intent: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_outcomes: DEFAULT_MAX_OUTCOMES,
            max_actions_per_intent: DEFAULT_MAX_ACTIONS_PER_INTENT,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Ledger snapshot file. `${VAR}` references and a leading `~/` are expanded.
    pub path: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

impl DecreeConfig {
    /// Load the config from the default location. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read config");
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let config: Self = match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to parse config");
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.engine.max_outcomes < 2 {
            return Err(format!(
                "engine.max_outcomes must be at least 2, got {}",
                self.engine.max_outcomes
            ));
        }
        if self.engine.max_actions_per_intent == 0 {
            return Err("engine.max_actions_per_intent must be at least 1".to_owned());
        }
        if let Some(filter) = &self.log.filter
            && filter.trim().is_empty()
        {
            return Err("log.filter must not be empty".to_owned());
        }
        Ok(())
    }

    /// Ledger file: the configured path if any, else `~/.decree/ledger.json`.
    #[must_use]
    pub fn ledger_path(&self) -> Option<PathBuf> {
        match &self.ledger.path {
            Some(raw) => Some(expand_path(raw)),
            None => decree_dir().map(|dir| dir.join("ledger.json")),
        }
    }
}

/// Replace `${VAR}` with the variable's value (empty if unset).
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + len];
        if var.is_empty() {
            out.push_str("${}");
        } else {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    out
}

/// Expand `${VAR}` references and a leading `~/`.
#[must_use]
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = expand_env_vars(raw);
    if let Some(rest) = expanded.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(expanded)
}

fn decree_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".decree"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    decree_dir().map(|dir| dir.join("config.toml"))
}
