//! Configuration file handling for the takedown CLI
//!
//! Manages configuration stored in `~/.config/takedown/config.toml` (or
//! platform equivalent).
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Hard-coded defaults
//! 2. Config file (`~/.config/takedown/config.toml`)
//! 3. Environment variables (`TAKEDOWN_*`)
//!
//! ## Example Config File
//!
//! ```toml
//! [policy]
//! strike_threshold = 3
//! auto_action_threshold = 0.9
//! assessment_timeout_secs = 5
//! counter_notice_business_days = 10
//!
//! [output]
//! json = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::compliance::EnginePolicy;

/// Errors from configuration handling
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration for the takedown CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TakedownConfig {
    /// Compliance policy knobs
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Compliance policy knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Strikes at which an account becomes termination-eligible
    #[serde(default = "default_strike_threshold")]
    pub strike_threshold: u32,

    /// Fingerprint confidence at or above which action is automatic
    #[serde(default = "default_auto_action_threshold")]
    pub auto_action_threshold: f64,

    /// Bound on the external risk-assessment call, in seconds
    #[serde(default = "default_assessment_timeout")]
    pub assessment_timeout_secs: u64,

    /// Counter-notice objection window, in business days
    #[serde(default = "default_business_days")]
    pub counter_notice_business_days: u32,

    /// Attempts to allocate a unique ticket id before giving up
    #[serde(default = "default_ticket_attempts")]
    pub ticket_id_max_attempts: u32,
}

fn default_strike_threshold() -> u32 {
    crate::compliance::DEFAULT_STRIKE_THRESHOLD
}

fn default_auto_action_threshold() -> f64 {
    crate::compliance::DEFAULT_AUTO_ACTION_THRESHOLD
}

fn default_assessment_timeout() -> u64 {
    5
}

fn default_business_days() -> u32 {
    crate::compliance::DEFAULT_BUSINESS_DAYS
}

fn default_ticket_attempts() -> u32 {
    16
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            strike_threshold: default_strike_threshold(),
            auto_action_threshold: default_auto_action_threshold(),
            assessment_timeout_secs: default_assessment_timeout(),
            counter_notice_business_days: default_business_days(),
            ticket_id_max_attempts: default_ticket_attempts(),
        }
    }
}

impl PolicyConfig {
    /// Engine policy derived from this config
    pub fn engine_policy(&self) -> EnginePolicy {
        EnginePolicy {
            strike_threshold: self.strike_threshold,
            auto_action_threshold: self.auto_action_threshold,
            assessment_timeout: Duration::from_secs(self.assessment_timeout_secs),
            counter_notice_business_days: self.counter_notice_business_days,
            ticket_id_max_attempts: self.ticket_id_max_attempts,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Emit JSON by default
    #[serde(default)]
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { json: false }
    }
}

// =============================================================================
// Configuration Loading and Saving
// =============================================================================

impl TakedownConfig {
    /// Get the default configuration file path
    ///
    /// Returns platform-specific config directory:
    /// - Linux: `~/.config/takedown/config.toml`
    /// - macOS: `~/Library/Application Support/takedown/config.toml`
    /// - Windows: `%APPDATA%\takedown\config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("takedown")
            .join("config.toml")
    }

    /// Load configuration from the default path
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    ///
    /// Returns default configuration if the file doesn't exist or can't be
    /// parsed; environment overrides apply either way.
    pub fn load_from(path: PathBuf) -> Self {
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("Config file not found at {:?}, using defaults", path);
                Self::default()
            }
        };

        config.apply_env_overrides();
        config
    }

    /// Apply `TAKEDOWN_*` environment overrides
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse::<u32>("TAKEDOWN_STRIKE_THRESHOLD") {
            self.policy.strike_threshold = v;
        }
        if let Some(v) = env_parse::<f64>("TAKEDOWN_AUTO_ACTION_THRESHOLD") {
            self.policy.auto_action_threshold = v;
        }
        if let Some(v) = env_parse::<u64>("TAKEDOWN_ASSESSMENT_TIMEOUT_SECS") {
            self.policy.assessment_timeout_secs = v;
        }
        if let Some(v) = env_parse::<u32>("TAKEDOWN_COUNTER_NOTICE_BUSINESS_DAYS") {
            self.policy.counter_notice_business_days = v;
        }
        if let Some(v) = env_parse::<bool>("TAKEDOWN_JSON") {
            self.output.json = v;
        }
    }

    /// Save configuration to a specific path
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to(&self, path: PathBuf) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    match std::env::var(name) {
        Ok(value) => match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!("Ignoring unparseable {}={}", name, value);
                None
            }
        },
        Err(_) => None,
    }
}
