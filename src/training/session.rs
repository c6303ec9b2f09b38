//! Interactive training session
//!
//! A representative types messages; a simulated customer answers with
//! emotion-shaped timing. Slash commands pick the customer or a scripted
//! call, nudge the customer's mood, keep call notes and show metrics.

use std::future::Future;
use std::io::Write;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::{
    CadenceAnalysis, CallRecord, CallScenario, ConversationMetrics, ConversationState,
    CustomerProfile, NO_CUSTOMER_REPLY, analyze, call_scenarios, contextual_reply,
    find_call_scenario, find_customer, progress_tips, roster,
};
use crate::{Flow, Result};
use crate::speech::{DecorationContext, Emotion, clean_for_speech, decorate};
use crate::timing::{Pacer, Typist, deliver_segments, plan_segments};
use crate::voice::Voice;

const PROMPT: &str = "\n👤 Representative: ";
const TOP_KEYWORDS: usize = 5;
/// Ring time before a scripted caller speaks
const CALL_RING: Duration = Duration::from_millis(1500);

/// One representative message and the customer's answer
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub response_time: Duration,
    pub analysis: CadenceAnalysis,
    pub reply: String,
}

/// Summary shown by `/analysis` and at the end of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub total_interactions: usize,
    pub average_response_ms: Option<u128>,
    pub emotion_progression: Vec<Emotion>,
    pub escalation_signals: usize,
    pub top_keywords: Vec<(String, usize)>,
}

impl AnalysisReport {
    /// Render for the terminal
    #[must_use]
    pub fn render(&self) -> String {
        let progression: Vec<&str> = self.emotion_progression.iter().map(|e| e.as_str()).collect();
        let average = self
            .average_response_ms
            .map_or_else(|| "n/a".to_string(), |ms| format!("{ms}ms"));

        let mut out = String::from("\n📈 Conversation Analysis\n════════════════════════\n");
        out.push_str(&format!("Total Interactions: {}\n", self.total_interactions));
        out.push_str(&format!("Avg Response Time: {average}\n"));
        out.push_str(&format!("Emotion Progression: {}\n", progression.join(" → ")));
        out.push_str(&format!("Escalation Signals: {}\n\n", self.escalation_signals));
        out.push_str("🔤 Top Customer Keywords:\n");
        for (word, count) in &self.top_keywords {
            out.push_str(&format!("   {word}: {count}\n"));
        }
        out
    }
}

/// A customer-service training conversation
pub struct TrainingSession<W, P> {
    typist: Typist<W, P>,
    rng: StdRng,
    voice: Option<Voice>,
    voice_enabled: bool,
    customer: Option<CustomerProfile>,
    state: ConversationState,
    metrics: ConversationMetrics,
    history: Vec<Interaction>,
    last_reply_at: Option<Instant>,
    call: CallRecord,
    opening_scenario: Option<&'static CallScenario>,
}

impl<W: Write + Send, P: Pacer> TrainingSession<W, P> {
    /// Create a session with no customer selected and voice off
    pub fn new(typist: Typist<W, P>) -> Self {
        Self {
            typist,
            rng: StdRng::from_entropy(),
            voice: None,
            voice_enabled: false,
            customer: None,
            state: ConversationState::default(),
            metrics: ConversationMetrics::default(),
            history: Vec::new(),
            last_reply_at: None,
            call: CallRecord::default(),
            opening_scenario: None,
        }
    }

    /// Speak customer replies through `voice`
    #[must_use]
    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = Some(voice);
        self.voice_enabled = true;
        self
    }

    /// Use a deterministic RNG for speech decoration
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Start with `customer` already selected
    #[must_use]
    pub fn with_customer(mut self, customer: CustomerProfile) -> Self {
        self.state = ConversationState::for_customer(&customer);
        self.customer = Some(customer);
        self
    }

    /// Play the scripted call `id` once the session starts
    ///
    /// # Errors
    ///
    /// Returns error if no scenario has this id
    pub fn with_scenario(mut self, id: &str) -> Result<Self> {
        self.opening_scenario = Some(find_call_scenario(id)?);
        Ok(self)
    }

    #[must_use]
    pub const fn state(&self) -> &ConversationState {
        &self.state
    }

    #[must_use]
    pub const fn metrics(&self) -> &ConversationMetrics {
        &self.metrics
    }

    #[must_use]
    pub const fn customer(&self) -> Option<&CustomerProfile> {
        self.customer.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[Interaction] {
        &self.history
    }

    /// Notes, grades and outcome of the current call
    #[must_use]
    pub const fn call(&self) -> &CallRecord {
        &self.call
    }

    #[must_use]
    pub const fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    /// Borrow the typist (and through it, the output)
    pub const fn typist(&self) -> &Typist<W, P> {
        &self.typist
    }

    /// Read lines from `input` until `/quit`, end of input or `shutdown`
    ///
    /// # Errors
    ///
    /// Returns error if reading input or writing output fails
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        self.start()?;
        if let Some(scenario) = self.opening_scenario.take() {
            self.start_scenario(scenario).await?;
        }

        let mut lines = input.lines();
        tokio::pin!(shutdown);

        loop {
            self.typist.write_now(PROMPT)?;
            let line = tokio::select! {
                line = lines.next_line() => line?,
                () = &mut shutdown => None,
            };
            let Some(line) = line else { break };

            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }

        self.finish()
    }

    /// Print the banner and the customer list
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub fn start(&mut self) -> Result<()> {
        self.typist.write_now(
            "🏦 Enhanced Financial Services Training AI\n\
             ═══════════════════════════════════════════\n\
             🎭 Natural Conversation with Human-like Patterns\n\
             🗣️  Voice synthesis with emotional cadence\n\
             🧠 Advanced conversation analysis and adaptation\n\n\
             💡 Commands: /scenario [id], /customer [id], /emotion [state], /help, /quit\n\n",
        )?;
        self.show_customers()?;
        self.show_scenarios()
    }

    /// Print the final analysis and goodbye
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub fn finish(&mut self) -> Result<()> {
        if !self.history.is_empty() {
            let report = self.report().render();
            self.typist.write_now(&report)?;
            let summary = self.call.render_summary();
            self.typist.write_now(&summary)?;
        }
        tracing::info!(interactions = self.history.len(), "training session finished");
        self.typist.write_now(
            "\n🎓 Training Session Complete\n\
             Thank you for using the Enhanced Financial Services Training AI!\n",
        )
    }

    /// Handle one input line: a command or a representative message
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.starts_with('/') {
            return self.handle_command(line).await;
        }
        if !line.is_empty() {
            let now = Instant::now();
            let elapsed = self
                .last_reply_at
                .map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
            self.respond(line, elapsed).await?;
        }
        Ok(Flow::Continue)
    }

    /// Answer a representative message that took `elapsed` to arrive
    ///
    /// Returns the customer's reply as delivered.
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub async fn respond(&mut self, message: &str, elapsed: Duration) -> Result<String> {
        self.metrics.response_times.push(elapsed);
        self.call.record(message);

        let analysis = analyze(message, elapsed);
        if let Some(customer) = &self.customer {
            self.state.update(&analysis, customer);
        }

        let reply = match &self.customer {
            Some(customer) => {
                let base =
                    contextual_reply(message, &analysis, self.state.emotion, &customer.account);
                let ctx = DecorationContext {
                    patterns: &customer.speech,
                    emotion: self.state.emotion,
                    heard_jargon: analysis.uses_jargon,
                    impatient: customer.is_impatient(),
                };
                decorate(&base, &ctx, &mut self.rng)
            }
            None => NO_CUSTOMER_REPLY.to_string(),
        };

        tracing::debug!(
            emotion = %self.state.emotion,
            speed = ?analysis.response_speed,
            "customer replying"
        );

        self.typist.write_now("\n📱 Customer: ")?;
        let segments = plan_segments(&reply, self.state.emotion);
        deliver_segments(&mut self.typist, &segments).await?;

        if self.voice_enabled {
            if let Some(voice) = &self.voice {
                self.typist
                    .write_now("\n🔊 [Speaking with natural voice patterns...]\n")?;
                let clip = voice
                    .speak(&clean_for_speech(&reply), self.state.emotion.voice_settings())
                    .await;
                self.typist.write_now(&format!("{clip}\n"))?;
            }
        }
        self.typist.write_now("\n")?;

        self.metrics.record_reply(&reply, self.state.emotion);
        self.history.push(Interaction {
            timestamp: Utc::now(),
            message: message.to_string(),
            response_time: elapsed,
            analysis,
            reply: reply.clone(),
        });
        self.last_reply_at = Some(Instant::now());

        for tip in progress_tips(self.call.checks()) {
            self.typist.write_now(&format!("{tip}\n"))?;
        }

        Ok(reply)
    }

    /// Current metrics summary
    #[must_use]
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            total_interactions: self.history.len(),
            average_response_ms: self.metrics.average_response_time().map(|d| d.as_millis()),
            emotion_progression: self.metrics.emotion_history.clone(),
            escalation_signals: self.metrics.escalation_signals,
            top_keywords: self.metrics.top_keywords(TOP_KEYWORDS),
        }
    }

    async fn handle_command(&mut self, line: &str) -> Result<Flow> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or_default().to_lowercase();
        let rest: Vec<&str> = parts.collect();
        let arg = rest.first().map(|a| a.to_lowercase());
        let arg = arg.as_deref();

        match cmd.as_str() {
            "/scenario" => match arg {
                Some(id) => self.select_scenario(id).await?,
                None => self.show_scenarios()?,
            },
            "/customer" => match arg {
                Some(id) => self.select_customer(id)?,
                None => self.show_customers()?,
            },
            "/emotion" => match arg {
                Some(name) => self.set_emotion(name)?,
                None => self.show_state()?,
            },
            "/account" => self.show_account()?,
            "/transactions" => self.show_transactions()?,
            "/notes" if rest.is_empty() => {
                let notes = self.call.render_notes();
                self.typist.write_now(&notes)?;
            }
            "/notes" => {
                self.call.add_note(&rest.join(" "));
                self.typist.write_now("✅ Note added to call record\n")?;
            }
            "/escalate" => {
                self.call.escalated = true;
                tracing::info!(scenario = ?self.call.scenario, "call escalated");
                self.typist.write_now(
                    "\n🔺 Call Escalated to Supervisor\n\
                     Reason for escalation will be documented in the call record.\n\
                     In real scenarios, provide detailed handoff notes to supervisor.\n",
                )?;
            }
            "/resolve" => {
                self.call.resolved = true;
                tracing::info!(scenario = ?self.call.scenario, "call resolved");
                let summary = self.call.render_summary();
                self.typist.write_now(&format!(
                    "\n✅ Call Marked as Resolved\nCustomer issue has been addressed successfully.\n{summary}"
                ))?;
            }
            "/score" => {
                let score = self
                    .call
                    .score()
                    .map_or_else(|| "📊 No interactions to score yet\n".to_string(), |s| s.render());
                self.typist.write_now(&score)?;
            }
            "/analysis" => {
                let report = self.report().render();
                self.typist.write_now(&report)?;
            }
            "/voice" => self.toggle_voice(arg)?,
            "/help" => self.typist.write_now(HELP)?,
            "/quit" | "/exit" | "/end" => return Ok(Flow::Quit),
            _ => self
                .typist
                .write_now("❌ Unknown command. Type /help for available commands.\n")?,
        }

        Ok(Flow::Continue)
    }

    async fn select_scenario(&mut self, id: &str) -> Result<()> {
        match find_call_scenario(id) {
            Ok(scenario) => self.start_scenario(scenario).await,
            Err(_) => {
                let mut out = String::from("❌ Scenario not found. Available scenarios:\n");
                for scenario in call_scenarios() {
                    out.push_str(&format!("   {}\n", scenario.id));
                }
                self.typist.write_now(&out)
            }
        }
    }

    /// Brief the representative, route the caller and play their opening line
    async fn start_scenario(&mut self, scenario: &'static CallScenario) -> Result<()> {
        tracing::info!(scenario = scenario.id, "scenario started");
        self.typist.write_now(&scenario.briefing())?;

        let customer = find_customer(scenario.customer_id)?;
        self.typist.write_now(&format!(
            "🆔 Customer Account: {} ({})\n📞 CALL INCOMING...\n\n",
            customer.name, customer.account_number
        ))?;
        self.state = ConversationState::for_customer(&customer);
        self.customer = Some(customer);
        self.call = CallRecord::new(Some(scenario.id));

        self.typist.pause(CALL_RING).await;

        let opening = scenario.opening(&mut self.rng);
        self.typist.write_now("📱 Customer: ")?;
        let segments = plan_segments(opening, self.state.emotion);
        deliver_segments(&mut self.typist, &segments).await?;
        self.typist.write_now(
            "\n\n💡 Remember to follow proper verification and service procedures\n\
             💡 Type /help for available commands during the call\n",
        )?;
        self.last_reply_at = Some(Instant::now());
        Ok(())
    }

    fn show_scenarios(&mut self) -> Result<()> {
        let mut out = String::from("\n📋 Available Training Scenarios:\n\n");
        for scenario in call_scenarios() {
            out.push_str(&format!(
                "{} {}\n   {}\n   {}\n\n",
                scenario.level.icon(),
                scenario.id,
                scenario.title,
                scenario.description,
            ));
        }
        self.typist.write_now(&out)
    }

    fn show_account(&mut self) -> Result<()> {
        let Some(customer) = &self.customer else {
            return self.typist.write_now("❌ No customer selected\n");
        };

        let account = &customer.account;
        let out = format!(
            "\n💰 Account Details\n══════════════════\n\
             Account Number: {}\n\
             Account Type: {}\n\
             Current Balance: ${:.2}\n\
             Card Status: {}\n",
            customer.account_number,
            account.account_type,
            account.balance,
            account.card_status.as_str(),
        );
        self.typist.write_now(&out)
    }

    fn show_transactions(&mut self) -> Result<()> {
        let Some(customer) = &self.customer else {
            return self.typist.write_now("❌ No customer selected\n");
        };

        let mut out = String::from("\n💳 Recent Transactions\n══════════════════════\n");
        for t in &customer.account.recent_transactions {
            let flag = if t.flagged { "🚩" } else { "  " };
            let sign = if t.amount < 0.0 { '-' } else { '+' };
            let amount = format!("{sign}${:.2}", t.amount.abs());
            out.push_str(&format!(
                "{flag} {} | {amount:>10} | {} | {}\n",
                t.date,
                t.merchant,
                t.status.as_str().to_uppercase(),
            ));
        }
        self.typist.write_now(&out)
    }

    fn select_customer(&mut self, id: &str) -> Result<()> {
        match find_customer(id) {
            Ok(customer) => {
                tracing::info!(customer = %customer.id, "customer selected");
                self.typist.write_now(&format!(
                    "✅ Selected customer: {}\n   Personality: {}, {}\n",
                    customer.name,
                    customer.personality.base_emotion,
                    customer.personality.communication_style.as_str(),
                ))?;
                self.state = ConversationState::for_customer(&customer);
                self.customer = Some(customer);
                Ok(())
            }
            Err(_) => self.typist.write_now("❌ Customer not found\n"),
        }
    }

    fn show_customers(&mut self) -> Result<()> {
        let mut out = String::from("👥 Available Customer Personalities:\n\n");
        for customer in roster() {
            let p = &customer.personality;
            out.push_str(&format!(
                "{} {} - {} ({}, {})\n   Tech Savvy: {}, Patience: {}\n\n",
                p.base_emotion.icon(),
                customer.id,
                customer.name,
                p.base_emotion,
                p.communication_style.as_str(),
                p.tech_savvy,
                p.patience,
            ));
        }
        self.typist.write_now(&out)
    }

    fn set_emotion(&mut self, name: &str) -> Result<()> {
        let settable = name
            .parse::<Emotion>()
            .ok()
            .filter(|e| Emotion::SETTABLE.contains(e));

        if let Some(emotion) = settable {
            self.state.emotion = emotion;
            self.typist.write_now(&format!(
                "✅ Customer emotion set to: {emotion} {}\n",
                emotion.icon()
            ))
        } else {
            let valid: Vec<&str> = Emotion::SETTABLE.iter().map(|e| e.as_str()).collect();
            self.typist.write_now(&format!(
                "❌ Invalid emotion. Valid options: {}\n",
                valid.join(", ")
            ))
        }
    }

    fn show_state(&mut self) -> Result<()> {
        let s = &self.state;
        let out = format!(
            "\n📊 Current Customer State:\n   Emotion: {} {}\n   Stress Level: {}\n   Trust Level: {}/10\n   Cooperation: {}\n",
            s.emotion,
            s.emotion.icon(),
            s.stress,
            s.trust,
            s.cooperation,
        );
        self.typist.write_now(&out)
    }

    fn toggle_voice(&mut self, arg: Option<&str>) -> Result<()> {
        match arg {
            Some("on") => {
                if self.voice.is_none() {
                    self.voice = Some(Voice::console());
                }
                self.voice_enabled = true;
                self.typist.write_now("🔊 Voice enabled\n")
            }
            Some("off") => {
                self.voice_enabled = false;
                self.typist.write_now("🔇 Voice disabled\n")
            }
            _ => {
                let status = if self.voice_enabled { "enabled" } else { "disabled" };
                self.typist
                    .write_now(&format!("Voice is currently {status}\n"))
            }
        }
    }
}

const HELP: &str = "\n📖 Enhanced Financial Training AI Help\n\
═════════════════════════════════════════\n\
📋 Scenario Management:\n\
\x20  /scenario [id]       - Start a scripted call\n\
\x20  /scenario            - List available scenarios\n\n\
📝 Call Management:\n\
\x20  /account             - Show account information\n\
\x20  /transactions        - Show transaction history\n\
\x20  /notes [text]        - Add a note or show notes\n\
\x20  /escalate            - Escalate to supervisor\n\
\x20  /resolve             - Mark call as resolved\n\
\x20  /score               - Show current performance score\n\
\x20  /end                 - End the call\n\n\
🎭 Customer Management:\n\
\x20  /customer [id]       - Select customer personality\n\
\x20  /emotion [state]     - Change customer emotional state\n\
\x20  /customer            - Show available customers\n\n\
🔊 Voice & Analysis:\n\
\x20  /voice on/off        - Toggle voice synthesis\n\
\x20  /analysis            - Show conversation metrics\n\
\x20  /emotion             - Show current customer state\n\
\x20  /quit                - End the session\n\n\
💡 Tips for Natural Conversations:\n\
\x20  • Pay attention to customer emotional cues\n\
\x20  • Adjust your pace based on customer responses\n\
\x20  • Notice speech patterns (stuttering, hesitation)\n\
\x20  • Respond appropriately to emotional state changes\n\n";
