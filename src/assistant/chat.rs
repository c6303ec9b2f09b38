//! Interactive chat with natural timing

use std::future::Future;
use std::io::Write;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::CannedResponder;
use crate::config::Config;
use crate::speech::VoiceSettings;
use crate::timing::{
    Pace, Pacer, TimingConfig, Typist, deliver_chunks, plan_chunks, plan_voice_chunks,
    thinking_indicator,
};
use crate::voice::{Voice, VoiceProvider, catalog};
use crate::{Flow, Result};

const PROMPT: &str = "\n💬 You: ";
const VOICE_TEST: &str = "This is a voice test. How does it sound?";

/// Opening line of every chat
pub const GREETING: &str = "Hello! I'm your conversational AI assistant with natural timing and cadence. \
    I'll pause to think before responding, breathe naturally during explanations, \
    and maintain a human-like conversation flow. \
    What would you like to discuss about your code or programming today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A chat with the canned coding assistant
pub struct ChatSession<W, P> {
    typist: Typist<W, P>,
    responder: CannedResponder<StdRng>,
    pace: Pace,
    config: TimingConfig,
    history: Vec<HistoryEntry>,
    voice: Option<Voice>,
    voice_enabled: bool,
    voice_settings: VoiceSettings,
    voice_config: Config,
}

impl<W: Write + Send, P: Pacer> ChatSession<W, P> {
    pub fn new(typist: Typist<W, P>, pace: Pace) -> Self {
        Self {
            typist,
            responder: CannedResponder::from_entropy(),
            pace,
            config: pace.timing(),
            history: Vec::new(),
            voice: None,
            voice_enabled: false,
            voice_settings: VoiceSettings::default(),
            voice_config: Config::default(),
        }
    }

    /// Speak replies through the voice `config` describes
    ///
    /// Falls back to the console when the provider cannot be set up.
    #[must_use]
    pub fn with_voice(mut self, config: Config) -> Self {
        let voice = Voice::from_config(&config).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "voice provider unavailable, using console");
            Voice::console()
        });
        self.voice = Some(voice);
        self.voice_enabled = config.voice.enabled;
        self.voice_config = config;
        self
    }

    #[must_use]
    pub fn with_responder(mut self, responder: CannedResponder<StdRng>) -> Self {
        self.responder = responder;
        self
    }

    #[must_use]
    pub const fn pace(&self) -> Pace {
        self.pace
    }

    #[must_use]
    pub const fn config(&self) -> &TimingConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.typist.is_active()
    }

    #[must_use]
    pub const fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    #[must_use]
    pub const fn voice_settings(&self) -> VoiceSettings {
        self.voice_settings
    }

    /// Provider replies are spoken through, if a voice is set up
    #[must_use]
    pub fn voice_provider(&self) -> Option<VoiceProvider> {
        self.voice.as_ref().map(Voice::provider)
    }

    pub const fn typist(&self) -> &Typist<W, P> {
        &self.typist
    }

    /// Chat over `input` until `/quit`, end of input or `shutdown`
    ///
    /// # Errors
    ///
    /// Returns error if reading input or writing output fails
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        self.start().await?;

        let mut lines = input.lines();
        tokio::pin!(shutdown);

        loop {
            self.typist.write_now(PROMPT)?;
            let line = tokio::select! {
                line = lines.next_line() => line?,
                () = &mut shutdown => {
                    self.typist.write_now("\n\n👋 Thanks for the conversation! Goodbye!\n")?;
                    None
                }
            };
            let Some(line) = line else { break };

            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }

        self.stop()
    }

    /// Banner, then the greeting with natural timing
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub async fn start(&mut self) -> Result<()> {
        self.typist.write_now(&format!(
            "🤖 Conversational AI with Natural Timing & Cadence\n\
             ═══════════════════════════════════════════════════\n\
             ✨ Features: Natural pauses, thinking time, breathing rhythm\n\
             🎭 Current pace: {}\n\
             🔊 Voice: {}\n\n\
             💡 Commands: /help, /pace [slow|normal|fast], /status, /voices, /voice [command], /quit\n\n",
            self.pace.as_str().to_uppercase(),
            self.voice_label(),
        ))?;

        self.typist.write_now("\n")?;
        thinking_indicator(&mut self.typist, self.config.thinking).await?;
        self.typist.write_now("🤖 AI: ")?;
        self.speak(GREETING).await?;
        self.speak_aloud(GREETING).await?;
        self.typist.write_now("\n\n")
    }

    /// Handle one input line
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let input = line.trim();
        let lower = input.to_lowercase();

        match lower.as_str() {
            "/quit" | "/exit" => {
                self.typist.write_now("\n👋 Goodbye!\n")?;
                return Ok(Flow::Quit);
            }
            "/help" => self.typist.write_now(HELP)?,
            "/status" => self.show_status()?,
            "/voices" => self.show_voices()?,
            "/voice" => self.voice_command("").await?,
            _ if lower.starts_with("/voice ") => {
                self.voice_command(&input["/voice ".len()..]).await?;
            }
            _ if lower.starts_with("/pace ") => self.change_pace(&lower["/pace ".len()..])?,
            "" => {}
            _ => self.converse(input).await?,
        }

        Ok(Flow::Continue)
    }

    /// Think, pick a reply and deliver it
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub async fn converse(&mut self, input: &str) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }

        self.history.push(HistoryEntry {
            role: Role::User,
            content: input.to_string(),
            timestamp: Utc::now(),
        });

        self.typist.write_now("\n")?;
        thinking_indicator(&mut self.typist, self.config.thinking).await?;

        let reply = self.responder.respond(input);
        self.history.push(HistoryEntry {
            role: Role::Assistant,
            content: reply.to_string(),
            timestamp: Utc::now(),
        });

        self.typist.write_now("🤖 AI: ")?;
        self.speak(reply).await?;
        self.speak_aloud(reply).await?;
        self.typist.write_now("\n\n")
    }

    async fn speak(&mut self, text: &str) -> Result<()> {
        let chunks = plan_chunks(text, &self.config);
        deliver_chunks(&mut self.typist, &chunks, self.config.typing_delay).await?;
        Ok(())
    }

    /// Voice `text` clause by clause with spoken pauses
    async fn speak_aloud(&mut self, text: &str) -> Result<()> {
        if !self.voice_enabled {
            return Ok(());
        }
        let Some(voice) = &self.voice else {
            return Ok(());
        };

        self.typist.write_now("\n🔊 Speaking response...\n")?;
        for chunk in plan_voice_chunks(text, &self.config) {
            if !self.typist.is_active() {
                break;
            }
            let clip = voice.speak(&chunk.text, self.voice_settings).await;
            self.typist.write_now(&format!("{clip}\n"))?;
            self.typist.pause(chunk.pause_after).await;
        }
        Ok(())
    }

    fn voice_label(&self) -> String {
        match (&self.voice, self.voice_enabled) {
            (Some(voice), true) => voice.provider().as_str().to_uppercase(),
            _ => "OFF".to_string(),
        }
    }

    async fn voice_command(&mut self, args: &str) -> Result<()> {
        let mut parts = args.split_whitespace();
        let action = parts.next().map(str::to_lowercase);
        let value = parts.next();

        match action.as_deref() {
            Some("test") => match (&self.voice, self.voice_enabled) {
                (Some(voice), true) => {
                    let clip = voice.speak(VOICE_TEST, self.voice_settings).await;
                    self.typist.write_now(&format!("{clip}\n"))
                }
                _ => self.typist.write_now("❌ Voice system not available\n"),
            },
            Some("provider") => match value {
                Some(name) => self.switch_provider(name),
                None => self.typist.write_now(&format!(
                    "Current voice provider: {}\nAvailable: webspeech, elevenlabs, openai, azure\n",
                    self.voice_provider().unwrap_or_default()
                )),
            },
            Some("rate") => {
                let rate = value.and_then(|v| v.parse::<f32>().ok());
                let applied = rate.is_some_and(|r| self.voice_settings.set_rate(r).is_ok());
                match rate {
                    Some(rate) if applied => {
                        self.typist.write_now(&format!("✅ Voice rate set to {rate}\n"))
                    }
                    _ => self.typist.write_now("❌ Rate must be between 0.5 and 2.0\n"),
                }
            }
            Some("volume") => {
                let volume = value.and_then(|v| v.parse::<f32>().ok());
                let applied = volume.is_some_and(|v| self.voice_settings.set_volume(v).is_ok());
                match volume {
                    Some(volume) if applied => self
                        .typist
                        .write_now(&format!("✅ Voice volume set to {volume}\n")),
                    _ => self.typist.write_now("❌ Volume must be between 0 and 1.0\n"),
                }
            }
            Some("on") => {
                if self.voice.is_none() {
                    let voice = Voice::from_config(&self.voice_config);
                    self.voice = Some(voice.unwrap_or_else(|_| Voice::console()));
                }
                self.voice_enabled = true;
                self.typist.write_now("🔊 Voice output enabled\n")
            }
            Some("off") => {
                self.voice_enabled = false;
                self.typist.write_now("🔇 Voice output disabled\n")
            }
            _ => self.typist.write_now(
                "❌ Unknown voice command. Try: test, provider, rate, volume, on, off\n",
            ),
        }
    }

    fn switch_provider(&mut self, name: &str) -> Result<()> {
        let Ok(provider) = name.parse::<VoiceProvider>() else {
            return self
                .typist
                .write_now("❌ Invalid provider. Available: webspeech, elevenlabs, openai, azure\n");
        };

        let mut config = self.voice_config.clone();
        config.voice.provider = provider;
        match Voice::from_config(&config) {
            Ok(voice) => {
                tracing::info!(%provider, "voice provider switched");
                self.voice = Some(voice);
                self.voice_config = config;
                self.typist
                    .write_now(&format!("✅ Switched to {provider} voice provider\n"))
            }
            Err(e) => self
                .typist
                .write_now(&format!("❌ Cannot switch to {provider}: {e}\n")),
        }
    }

    fn show_voices(&mut self) -> Result<()> {
        let provider = match (&self.voice, self.voice_enabled) {
            (Some(voice), true) => voice.provider(),
            _ => return self.typist.write_now("❌ Voice system not available\n"),
        };

        let mut out = String::from("\n🎭 Available Voices:\n");
        let voices = catalog(provider);
        if voices.is_empty() {
            out.push_str("  No voices available for current provider\n");
        }
        for (i, v) in voices.iter().enumerate() {
            out.push_str(&format!("  {}. {} ({})\n", i + 1, v.name, v.style));
        }
        self.typist.write_now(&out)
    }

    fn change_pace(&mut self, name: &str) -> Result<()> {
        match name.trim().parse::<Pace>() {
            Ok(pace) => {
                self.pace = pace;
                self.config = pace.timing();
                tracing::info!(%pace, "conversation pace changed");
                self.typist.write_now(&format!(
                    "\n⚡ Conversation pace changed to: {}\n   Thinking time: {}ms\n   Typing speed: {}ms per character\n",
                    pace.as_str().to_uppercase(),
                    self.config.thinking.as_millis(),
                    self.config.typing_delay.as_millis(),
                ))
            }
            Err(_) => self
                .typist
                .write_now("\n❌ Invalid pace. Available options: slow, normal, fast\n"),
        }
    }

    fn show_status(&mut self) -> Result<()> {
        let status = format!(
            "\n📊 Conversation Status:\n   Current pace: {}\n   Messages exchanged: {}\n   Thinking time: {}ms\n   Typing speed: {}ms/char\n   Session active: {}\n",
            self.pace.as_str().to_uppercase(),
            self.history.len(),
            self.config.thinking.as_millis(),
            self.config.typing_delay.as_millis(),
            if self.is_active() { "Yes" } else { "No" },
        );
        self.typist.write_now(&status)
    }

    /// Deactivate and print the summary
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub fn stop(&mut self) -> Result<()> {
        self.typist.activity().set_active(false);
        tracing::info!(messages = self.history.len(), "chat finished");
        self.typist.write_now(&format!(
            "\n📊 Conversation Summary:\n   Total messages: {}\n   Final pace: {}\n\nThank you for using Natural Conversation AI! 🤖✨\n",
            self.history.len(),
            self.pace,
        ))
    }
}

const HELP: &str = "\n📖 Conversational AI Help\n\
══════════════════════════\n\
🎭 Features:\n\
\x20  ✓ Natural thinking pauses before responses\n\
\x20  ✓ Breathing pauses during explanations\n\
\x20  ✓ Realistic typing rhythm and speed\n\
\x20  ✓ Context-aware responses\n\
\x20  ✓ Adjustable conversation pace\n\n\
💬 Commands:\n\
\x20  /help              - Show this help message\n\
\x20  /pace slow         - Slow conversation (3s thinking, 80ms typing)\n\
\x20  /pace normal       - Normal conversation (1.5s thinking, 40ms typing)\n\
\x20  /pace fast         - Fast conversation (0.8s thinking, 20ms typing)\n\
\x20  /status            - Show current conversation status\n\
\x20  /voices            - List voices of the current provider\n\
\x20  /voice test        - Speak a test phrase\n\
\x20  /voice provider [name] - Switch voice provider\n\
\x20  /voice rate [0.5-2.0]  - Adjust speech rate\n\
\x20  /voice volume [0-1.0]  - Adjust volume\n\
\x20  /voice on/off      - Enable or disable voice\n\
\x20  /quit or /exit     - End conversation\n\
\x20  Ctrl+C             - Quick exit\n\n\
💡 Tips:\n\
\x20  • Ask about code, debugging, algorithms, or general programming\n\
\x20  • The AI will pause to \"think\" before complex responses\n\
\x20  • Natural breathing pauses make conversations feel more human\n\
\x20  • Try different paces to find your preferred conversation speed\n";
