//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.pollcall/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PollcallConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub landing: LandingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LandingConfig {
    pub embed_base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_EMBED_BASE_URL: &str = "https://docs.google.com/spreadsheet/embeddedform";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub embed_base_url: String,
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

/// Returns the path to `~/.pollcall/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pollcall").join("config.toml"))
}

/// Load config from `~/.pollcall/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PollcallConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PollcallConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PollcallConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PollcallConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: PollcallConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Pollcall Configuration
# All settings are optional, defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost:8080"   # Or set POLLCALL_BASE_URL env var

# [landing]
# embed_base_url = "https://docs.google.com/spreadsheet/embeddedform"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env → CLI.
///
/// `cli_base_url` is from the `--base-url` flag (None = not specified).
pub fn resolve(config: &PollcallConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    // Backend base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("POLLCALL_BASE_URL").ok())
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Survey embed base URL: env → config → default
    let embed_base_url = std::env::var("POLLCALL_EMBED_BASE_URL")
        .ok()
        .or_else(|| config.landing.embed_base_url.clone())
        .unwrap_or_else(|| DEFAULT_EMBED_BASE_URL.to_string());

    ResolvedConfig {
        base_url,
        embed_base_url,
    }
}
