//! On-disk settings in `~/.config/cadence/config.toml`
//!
//! Every key is optional. Whatever the file sets is layered over the built-in
//! defaults, and environment variables win over both.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Parsed contents of `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub timing: TimingSection,
    pub voice: VoiceSection,
    /// Credentials for hosted speech services
    pub api_keys: KeysSection,
    pub azure: AzureSection,
    /// GUI server
    pub server: ServerSection,
}

/// `[timing]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TimingSection {
    /// One of `slow`, `normal`, `fast`
    pub pace: Option<String>,
    /// Random per-character spread, `0` for none
    pub jitter: Option<f64>,
}

/// `[voice]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VoiceSection {
    pub enabled: Option<bool>,
    /// One of `console`, `openai`, `elevenlabs`, `azure`
    pub provider: Option<String>,
    pub voice: Option<String>,
    pub model: Option<String>,
    /// Directory for synthesized clips
    pub output_dir: Option<String>,
}

/// `[api_keys]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KeysSection {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
    pub azure_speech: Option<String>,
}

/// `[azure]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AzureSection {
    pub region: Option<String>,
}

/// `[server]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: Option<u16>,
    /// Holds `training-gui.html` and its assets
    pub static_dir: Option<String>,
}

/// Read the settings file from its usual location
///
/// An absent or unreadable file yields empty settings.
pub fn load_config_file() -> ConfigFile {
    config_file_path()
        .map(|path| load_from(&path))
        .unwrap_or_default()
}

/// Read settings from `path`; problems are logged and yield empty settings
pub fn load_from(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| toml::from_str::<ConfigFile>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(file) => {
            tracing::info!(path = %path.display(), "settings file applied");
            file
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "ignoring settings file");
            ConfigFile::default()
        }
    }
}

/// `~/.config/cadence/config.toml`, when a home directory is known
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("cadence").join("config.toml"))
}
