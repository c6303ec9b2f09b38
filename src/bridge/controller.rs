//! Conversation driven by bridge requests

use rand::Rng;
use tokio::sync::mpsc::UnboundedSender;

use super::{BridgeEvent, BridgeRequest};
use crate::Flow;
use crate::assistant::CannedResponder;
use crate::timing::{Interrupt, Pacer, TimingConfig, plan_chunks};

/// Reacts to bridge requests and streams events back
pub struct ConversationController<P, R> {
    timing: TimingConfig,
    pacer: P,
    responder: CannedResponder<R>,
    interrupt: Interrupt,
    started: bool,
    paused: bool,
    events: UnboundedSender<BridgeEvent>,
}

impl<P: Pacer, R: Rng> ConversationController<P, R> {
    pub fn new(
        timing: TimingConfig,
        pacer: P,
        responder: CannedResponder<R>,
        events: UnboundedSender<BridgeEvent>,
    ) -> Self {
        Self {
            timing,
            pacer,
            responder,
            interrupt: Interrupt::new(),
            started: false,
            paused: false,
            events,
        }
    }

    /// Handle on the running delivery, for whoever reads requests
    #[must_use]
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    #[must_use]
    pub const fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Handle one request
    pub async fn handle(&mut self, request: BridgeRequest) -> Flow {
        match request {
            BridgeRequest::Start => {
                self.started = true;
                self.paused = false;
                tracing::info!("bridge conversation started");
                self.emit(BridgeEvent::Started);
            }
            BridgeRequest::Input { text } => self.respond(&text).await,
            BridgeRequest::Pause => {
                self.paused = true;
                self.emit(BridgeEvent::Paused);
            }
            BridgeRequest::Resume => {
                self.paused = false;
                self.emit(BridgeEvent::Resumed);
            }
            BridgeRequest::Configure { timing } => {
                self.timing.apply(&timing);
                tracing::debug!(?timing, "bridge timing updated");
                self.emit(BridgeEvent::Configured);
            }
            BridgeRequest::Stop => {
                tracing::info!("bridge conversation stopped");
                self.emit(BridgeEvent::Stopped);
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Thinking pause, canned reply, then chunked delivery
    async fn respond(&mut self, text: &str) {
        if !self.started {
            self.emit(BridgeEvent::error("conversation not started"));
            return;
        }
        if self.paused {
            self.emit(BridgeEvent::error("conversation is paused"));
            return;
        }

        self.interrupt.begin();
        self.emit(BridgeEvent::Thinking);
        self.interrupt.wait(&self.pacer, self.timing.thinking).await;

        let reply = self.responder.respond(text);
        for chunk in plan_chunks(reply, &self.timing) {
            if self.interrupt.is_raised() {
                tracing::debug!("delivery interrupted");
                break;
            }
            self.emit(BridgeEvent::Chunk {
                text: chunk.text,
                pause_after_ms: u64::try_from(chunk.pause_after.as_millis()).unwrap_or(u64::MAX),
            });
            self.interrupt.wait(&self.pacer, chunk.pause_after).await;
        }
        self.interrupt.finish();

        self.emit(BridgeEvent::Response {
            text: reply.to_string(),
        });
    }

    fn emit(&self, event: BridgeEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("bridge output closed, dropping event");
        }
    }
}
