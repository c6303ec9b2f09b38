//! Text-to-speech (TTS) over HTTP

use crate::speech::VoiceSettings;
use crate::{Error, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Remote TTS backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TtsProvider {
    OpenAi,
    ElevenLabs,
    Azure,
}

/// Synthesizes MP3 audio from text
pub struct Synthesizer {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    model: String,
    base_url: String,
    provider: TtsProvider,
}

impl Synthesizer {
    /// Create an `OpenAI` synthesizer
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new_openai(api_key: String, voice: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("OpenAI API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
            provider: TtsProvider::OpenAi,
        })
    }

    /// Create an ElevenLabs synthesizer
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new_elevenlabs(api_key: String, voice_id: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice: voice_id,
            model,
            base_url: ELEVENLABS_BASE_URL.to_string(),
            provider: TtsProvider::ElevenLabs,
        })
    }

    /// Create an Azure Speech synthesizer for `region`
    ///
    /// # Errors
    ///
    /// Returns error if the subscription key is missing
    pub fn new_azure(api_key: String, voice: String, region: &str) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Azure Speech key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            model: String::new(),
            base_url: format!("https://{region}.tts.speech.microsoft.com"),
            provider: TtsProvider::Azure,
        })
    }

    /// Send requests somewhere else (proxies, local mocks)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn provider(&self) -> TtsProvider {
        self.provider
    }

    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it
    pub async fn synthesize(&self, text: &str, settings: VoiceSettings) -> Result<Vec<u8>> {
        tracing::debug!(provider = ?self.provider, chars = text.len(), "synthesizing speech");

        let request = match self.provider {
            TtsProvider::OpenAi => self.openai_request(text, settings),
            TtsProvider::ElevenLabs => self.elevenlabs_request(text),
            TtsProvider::Azure => self.azure_request(text, settings),
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!(
                "{:?} TTS error {status}: {body}",
                self.provider
            )));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }

    fn openai_request(&self, text: &str, settings: VoiceSettings) -> reqwest::RequestBuilder {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            response_format: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: "mp3",
            speed: settings.rate,
        };

        self.client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
    }

    fn elevenlabs_request(&self, text: &str) -> reqwest::RequestBuilder {
        #[derive(serde::Serialize)]
        struct ElevenLabsVoiceSettings {
            stability: f32,
            similarity_boost: f32,
            style: f32,
            use_speaker_boost: bool,
        }

        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
            voice_settings: ElevenLabsVoiceSettings,
        }

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model,
            voice_settings: ElevenLabsVoiceSettings {
                stability: 0.5,
                similarity_boost: 0.5,
                style: 0.0,
                use_speaker_boost: true,
            },
        };

        self.client
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, self.voice))
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
    }

    fn azure_request(&self, text: &str, settings: VoiceSettings) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/cognitiveservices/v1", self.base_url))
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", "audio-24khz-48kbitrate-mono-mp3")
            .body(ssml(&self.voice, text, settings))
    }
}

/// Azure SSML document with prosody from `settings`
#[must_use]
pub fn ssml(voice: &str, text: &str, settings: VoiceSettings) -> String {
    let pitch = ((settings.pitch - 1.0) * 100.0).round();
    let volume = (settings.volume * 100.0).round();
    format!(
        r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xml:lang="en-US"><voice name="{}"><prosody rate="{}" pitch="{pitch:+}%" volume="{volume}">{}</prosody></voice></speak>"#,
        escape_xml(voice),
        settings.rate,
        escape_xml(text),
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
