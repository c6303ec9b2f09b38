//! Voice output
//!
//! A thin wrapper over the TTS providers. Without a remote provider the
//! words that would be spoken are shown on the console instead.

mod tts;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use tts::{Synthesizer, TtsProvider, ssml};

use crate::config::Config;
use crate::speech::VoiceSettings;
use crate::{Error, Result};

const DEFAULT_OPENAI_VOICE: &str = "alloy";
const DEFAULT_OPENAI_MODEL: &str = "tts-1";
const DEFAULT_ELEVENLABS_VOICE: &str = "EXAVITQu4vr4xnSDxMaL";
const DEFAULT_ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_AZURE_VOICE: &str = "en-US-JennyMultilingualNeural";

/// Where spoken text goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceProvider {
    /// Print to the console
    #[default]
    #[serde(alias = "webspeech")]
    Console,
    OpenAi,
    ElevenLabs,
    Azure,
}

impl VoiceProvider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::OpenAi => "openai",
            Self::ElevenLabs => "elevenlabs",
            Self::Azure => "azure",
        }
    }
}

impl fmt::Display for VoiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" | "webspeech" | "text" => Ok(Self::Console),
            "openai" => Ok(Self::OpenAi),
            "elevenlabs" => Ok(Self::ElevenLabs),
            "azure" => Ok(Self::Azure),
            other => Err(Error::Voice(format!("unknown voice provider: {other}"))),
        }
    }
}

/// Outcome of speaking some text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpokenClip {
    /// Shown on the console
    Console { text: String },
    /// Synthesized and written to disk
    Saved { path: PathBuf, bytes: usize },
}

impl fmt::Display for SpokenClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console { text } => write!(f, "🔊 [VOICE]: {text}"),
            Self::Saved { path, bytes } => {
                write!(f, "🔊 [VOICE]: saved {bytes} bytes to {}", path.display())
            }
        }
    }
}

/// A voice the provider offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    pub name: &'static str,
    pub id: &'static str,
    pub style: &'static str,
}

const fn voice(name: &'static str, id: &'static str, style: &'static str) -> VoiceInfo {
    VoiceInfo { name, id, style }
}

const ELEVENLABS_VOICES: &[VoiceInfo] = &[
    voice("Bella", "EXAVITQu4vr4xnSDxMaL", "conversational"),
    voice("Rachel", "21m00Tcm4TlvDq8ikWAM", "calm"),
    voice("Domi", "AZnzlk1XvdvUeBnXmlld", "strong"),
    voice("Elli", "MF3mGyEYCl7XYWbV9V6O", "emotional"),
];

const OPENAI_VOICES: &[VoiceInfo] = &[
    voice("Alloy", "alloy", "neutral"),
    voice("Echo", "echo", "male"),
    voice("Fable", "fable", "british_male"),
    voice("Onyx", "onyx", "deep_male"),
    voice("Nova", "nova", "female"),
    voice("Shimmer", "shimmer", "soft_female"),
];

const AZURE_VOICES: &[VoiceInfo] = &[voice("Jenny", DEFAULT_AZURE_VOICE, "multilingual")];

/// Built-in voices for `provider`
#[must_use]
pub const fn catalog(provider: VoiceProvider) -> &'static [VoiceInfo] {
    match provider {
        VoiceProvider::ElevenLabs => ELEVENLABS_VOICES,
        VoiceProvider::OpenAi => OPENAI_VOICES,
        VoiceProvider::Azure => AZURE_VOICES,
        VoiceProvider::Console => &[],
    }
}

/// Speaks text through the configured provider
pub struct Voice {
    provider: VoiceProvider,
    synthesizer: Option<Synthesizer>,
    output_dir: PathBuf,
}

impl Voice {
    /// Console-only voice
    #[must_use]
    pub fn console() -> Self {
        Self {
            provider: VoiceProvider::Console,
            synthesizer: None,
            output_dir: PathBuf::from("."),
        }
    }

    /// Voice backed by an explicit synthesizer
    #[must_use]
    pub fn with_synthesizer(synthesizer: Synthesizer, output_dir: impl Into<PathBuf>) -> Self {
        let provider = match synthesizer.provider() {
            TtsProvider::OpenAi => VoiceProvider::OpenAi,
            TtsProvider::ElevenLabs => VoiceProvider::ElevenLabs,
            TtsProvider::Azure => VoiceProvider::Azure,
        };
        Self {
            provider,
            synthesizer: Some(synthesizer),
            output_dir: output_dir.into(),
        }
    }

    /// Build the voice described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the provider's API key is missing
    pub fn from_config(config: &Config) -> Result<Self> {
        let voice = &config.voice;
        let keys = &config.api_keys;
        let pick = |default: &str| voice.voice.clone().unwrap_or_else(|| default.to_string());
        let model = |default: &str| voice.model.clone().unwrap_or_else(|| default.to_string());

        let synthesizer = match voice.provider {
            VoiceProvider::Console => return Ok(Self::console()),
            VoiceProvider::OpenAi => Synthesizer::new_openai(
                keys.openai.clone().unwrap_or_default(),
                pick(DEFAULT_OPENAI_VOICE),
                model(DEFAULT_OPENAI_MODEL),
            )?,
            VoiceProvider::ElevenLabs => Synthesizer::new_elevenlabs(
                keys.elevenlabs.clone().unwrap_or_default(),
                pick(DEFAULT_ELEVENLABS_VOICE),
                model(DEFAULT_ELEVENLABS_MODEL),
            )?,
            VoiceProvider::Azure => Synthesizer::new_azure(
                keys.azure_speech.clone().unwrap_or_default(),
                pick(DEFAULT_AZURE_VOICE),
                &config.azure.region,
            )?,
        };

        tracing::info!(provider = %voice.provider, "voice synthesis enabled");
        Ok(Self::with_synthesizer(synthesizer, &voice.output_dir))
    }

    #[must_use]
    pub const fn provider(&self) -> VoiceProvider {
        self.provider
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Speak `text`, falling back to the console if synthesis fails
    pub async fn speak(&self, text: &str, settings: VoiceSettings) -> SpokenClip {
        let Some(synthesizer) = &self.synthesizer else {
            return SpokenClip::Console {
                text: text.to_string(),
            };
        };

        match self.synthesize_to_file(synthesizer, text, settings).await {
            Ok(clip) => clip,
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider,
                    error = %e,
                    "speech synthesis failed, falling back to console"
                );
                SpokenClip::Console {
                    text: text.to_string(),
                }
            }
        }
    }

    async fn synthesize_to_file(
        &self,
        synthesizer: &Synthesizer,
        text: &str,
        settings: VoiceSettings,
    ) -> Result<SpokenClip> {
        let audio = synthesizer.synthesize(text, settings).await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let name = format!(
            "{}-{}.mp3",
            chrono::Utc::now().format("%Y%m%dT%H%M%S"),
            uuid::Uuid::new_v4().simple()
        );
        let path = self.output_dir.join(name);
        tokio::fs::write(&path, &audio).await?;

        tracing::debug!(path = %path.display(), bytes = audio.len(), "speech saved");
        Ok(SpokenClip::Saved {
            path,
            bytes: audio.len(),
        })
    }
}
