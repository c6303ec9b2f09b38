//! Configuration management for Cadence
//!
//! Values come from the environment first, then the TOML file, then
//! built-in defaults.

pub mod file;

use std::path::PathBuf;

use crate::timing::{DEFAULT_JITTER, Pace};
use crate::voice::VoiceProvider;
use crate::Result;

use file::ConfigFile;

/// Default GUI server port
pub const DEFAULT_PORT: u16 = 3000;

/// Default Azure Speech region
pub const DEFAULT_AZURE_REGION: &str = "eastus";

/// Cadence configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Conversation timing
    pub timing: TimingSettings,

    /// Voice output
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Azure Speech settings
    pub azure: AzureConfig,

    /// Training GUI server
    pub server: ServerConfig,
}

/// Timing defaults for the demos
#[derive(Debug, Clone, Copy)]
pub struct TimingSettings {
    pub pace: Pace,

    /// Random spread per typed character
    pub jitter: f64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            pace: Pace::default(),
            jitter: DEFAULT_JITTER,
        }
    }
}

/// Voice output configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Speak customer replies
    pub enabled: bool,

    pub provider: VoiceProvider,

    /// Provider voice identifier; provider default when unset
    pub voice: Option<String>,

    /// Provider model; provider default when unset
    pub model: Option<String>,

    /// Where synthesized clips are written
    pub output_dir: PathBuf,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: VoiceProvider::Console,
            voice: None,
            model: None,
            output_dir: default_output_dir(),
        }
    }
}

/// API keys for TTS providers
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
    pub azure_speech: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub region: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_AZURE_REGION.to_string(),
        }
    }
}

/// Training GUI server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Directory with static GUI files
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Clip directory (~/.local/share/cadence/clips on Linux)
fn default_output_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("clips"),
        |d| d.data_dir().join("cadence").join("clips"),
    )
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a pace or voice provider name is invalid
    pub fn load() -> Result<Self> {
        Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment lookups
    ///
    /// # Errors
    ///
    /// Returns error if a pace or voice provider name is invalid
    pub fn from_sources<F>(fc: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // Timing (env > toml > default)
        let pace = match env("CADENCE_PACE").or(fc.timing.pace) {
            Some(name) => name.parse()?,
            None => defaults.timing.pace,
        };
        let timing = TimingSettings {
            pace,
            jitter: fc.timing.jitter.map_or(defaults.timing.jitter, |j| j.max(0.0)),
        };

        // API keys (env > toml > None)
        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY").or(fc.api_keys.openai),
            elevenlabs: env("ELEVENLABS_API_KEY").or(fc.api_keys.elevenlabs),
            azure_speech: env("AZURE_SPEECH_KEY").or(fc.api_keys.azure_speech),
        };

        let azure = AzureConfig {
            region: env("AZURE_SPEECH_REGION")
                .or(fc.azure.region)
                .unwrap_or(defaults.azure.region),
        };

        // Voice (env > toml > default)
        let provider = match env("CADENCE_VOICE_PROVIDER").or(fc.voice.provider) {
            Some(name) => name.parse()?,
            None => defaults.voice.provider,
        };
        let voice = VoiceConfig {
            enabled: fc.voice.enabled.unwrap_or(defaults.voice.enabled),
            provider,
            voice: env("CADENCE_VOICE").or(fc.voice.voice),
            model: fc.voice.model,
            output_dir: fc
                .voice
                .output_dir
                .map_or(defaults.voice.output_dir, PathBuf::from),
        };

        // Server (env > toml > default)
        let server = ServerConfig {
            port: env("CADENCE_PORT")
                .or_else(|| env("PORT"))
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(defaults.server.port),
            static_dir: env("CADENCE_STATIC_DIR")
                .or(fc.server.static_dir)
                .map_or(defaults.server.static_dir, PathBuf::from),
        };

        tracing::debug!(
            pace = %timing.pace,
            provider = %voice.provider,
            port = server.port,
            "configuration loaded"
        );

        Ok(Self {
            timing,
            voice,
            api_keys,
            azure,
            server,
        })
    }
}
