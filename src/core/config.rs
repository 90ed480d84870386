//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.ridealong/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::http::DEFAULT_PLATFORM;
use crate::core::trip::Mode;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RideConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_mode: Option<Mode>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

/// Android emulator alias for the host machine's backend.
pub const DEFAULT_API_BASE_URL: &str = "http://10.0.2.2:9000";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub mode: Mode,
    pub api_base_url: String,
    pub platform: String,
    /// `None` selects the in-memory chat backend.
    pub chat_base_url: Option<String>,
    pub chat_api_key: Option<String>,
    /// Overrides the stored credentials' token.
    pub token: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.ridealong/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ridealong").join("config.toml"))
}

/// Load config from `~/.ridealong/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RideConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RideConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(RideConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<RideConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RideConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RideConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config.general);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Ridealong Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_mode = "passenger"         # "passenger" or "driver"

# [api]
# base_url = "http://10.0.2.2:9000"  # Or set RIDEALONG_API_URL
# platform = "mobile"                # Sent as the X-Platform header

# [chat]
# base_url = "http://localhost:9100" # Leave unset for in-process chats
# api_key = "..."                    # Or set RIDEALONG_CHAT_API_KEY
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Command-line overrides (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub mode: Option<Mode>,
    pub api_url: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RideConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// `resolve` with an injectable environment lookup.
pub fn resolve_with(
    config: &RideConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Mode: CLI → env → config → default
    let mode = cli
        .mode
        .or_else(|| {
            env("RIDEALONG_MODE").and_then(|s| match Mode::from_str(&s, true) {
                Ok(mode) => Some(mode),
                Err(_) => {
                    warn!("Ignoring unknown RIDEALONG_MODE '{}'", s);
                    None
                }
            })
        })
        .or(config.general.default_mode)
        .unwrap_or_default();

    // API base URL: CLI → env → config → default
    let api_base_url = cli
        .api_url
        .clone()
        .or_else(|| env("RIDEALONG_API_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    let platform = env("RIDEALONG_PLATFORM")
        .or_else(|| config.api.platform.clone())
        .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());

    let chat_base_url = env("RIDEALONG_CHAT_URL")
        .or_else(|| config.chat.base_url.clone())
        .filter(|url| !url.trim().is_empty());

    let chat_api_key = env("RIDEALONG_CHAT_API_KEY").or_else(|| config.chat.api_key.clone());

    ResolvedConfig {
        mode,
        api_base_url,
        platform,
        chat_base_url,
        chat_api_key,
        token: env("RIDEALONG_TOKEN"),
    }
}
