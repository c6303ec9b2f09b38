//! Character-level typing rhythm
//!
//! The [`Typist`] writes text one character at a time, waiting a
//! punctuation-dependent delay between characters. Waiting goes through a
//! [`Pacer`] so delivery can run against real time or be recorded.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Notify;

use crate::Result;

/// Shortest delay between two typed characters
pub const MIN_CHAR_DELAY: Duration = Duration::from_millis(10);

/// Default random spread applied to each character delay
pub const DEFAULT_JITTER: f64 = 0.3;

/// Delay after typing `c`
///
/// `unit` is a random value in `[-0.5, 0.5)`; it is scaled by `jitter` and
/// the base delay so the rhythm never sounds mechanical.
#[must_use]
pub fn char_delay(c: char, base: Duration, jitter: f64, unit: f64) -> Duration {
    let factor = match c {
        ' ' => 0.3,
        '.' | '!' | '?' => 3.0,
        ',' => 2.0,
        '-' => 1.5,
        '\n' => 5.0,
        _ => 1.0,
    };

    #[allow(clippy::cast_precision_loss)]
    let base_ms = base.as_micros() as f64 / 1000.0;
    let ms = base_ms.mul_add(factor, unit * base_ms * jitter);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let micros = (ms * 1000.0).round().max(0.0) as u64;
    Duration::from_micros(micros).max(MIN_CHAR_DELAY)
}

/// Something that can wait
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait for `duration`
    async fn pause(&self, duration: Duration);
}

/// Waits on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Returns immediately and remembers every requested pause
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPacer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far
    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Total requested waiting time
    #[must_use]
    pub fn total(&self) -> Duration {
        self.pauses().iter().sum()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(duration);
        }
    }
}

/// Shared on/off switch for a delivery in progress
///
/// While inactive, pauses are skipped and typing stops at the next character.
#[derive(Debug, Clone)]
pub struct ActivityFlag(Arc<AtomicBool>);

impl Default for ActivityFlag {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl ActivityFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set_active(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }
}

/// Cuts short the delivery that is currently running
///
/// Raising it outside a delivery does nothing, so a request queued behind an
/// interrupt is still answered in full. Waits made through [`Interrupt::wait`]
/// end as soon as it is raised.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<InterruptState>);

#[derive(Debug, Default)]
struct InterruptState {
    delivering: AtomicBool,
    raised: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a delivery as running and clear any earlier interrupt
    pub fn begin(&self) {
        self.0.raised.store(false, Ordering::SeqCst);
        self.0.delivering.store(true, Ordering::SeqCst);
    }

    /// Mark the delivery as over
    pub fn finish(&self) {
        self.0.delivering.store(false, Ordering::SeqCst);
    }

    /// Interrupt the running delivery
    ///
    /// Returns `false` if nothing was being delivered.
    pub fn raise(&self) -> bool {
        if !self.0.delivering.load(Ordering::SeqCst) {
            return false;
        }
        self.0.raised.store(true, Ordering::SeqCst);
        self.0.notify.notify_waiters();
        true
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.raised.load(Ordering::SeqCst)
    }

    /// Wait `duration` on `pacer`, returning early once raised
    pub async fn wait<P: Pacer>(&self, pacer: &P, duration: Duration) {
        let notified = self.0.notify.notified();
        tokio::pin!(notified);
        // Register before checking so a raise in between still wakes us
        notified.as_mut().enable();
        if self.is_raised() {
            return;
        }

        tokio::select! {
            () = pacer.pause(duration) => {}
            () = notified => {}
        }
    }
}

/// Types text into a writer with a natural rhythm
pub struct Typist<W, P> {
    out: W,
    pacer: P,
    activity: ActivityFlag,
    jitter: f64,
    rng: StdRng,
}

impl<W: Write + Send, P: Pacer> Typist<W, P> {
    /// Create a typist with default jitter and an entropy-seeded RNG
    pub fn new(out: W, pacer: P) -> Self {
        Self {
            out,
            pacer,
            activity: ActivityFlag::new(),
            jitter: DEFAULT_JITTER,
            rng: StdRng::from_entropy(),
        }
    }

    /// Share an activity flag with a controller
    #[must_use]
    pub fn with_activity(mut self, activity: ActivityFlag) -> Self {
        self.activity = activity;
        self
    }

    /// Set the jitter factor (0 disables randomness)
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    /// Use a deterministic RNG
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub const fn activity(&self) -> &ActivityFlag {
        &self.activity
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activity.is_active()
    }

    /// Write text immediately, without rhythm
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub fn write_now(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Wait unless delivery has been deactivated
    pub async fn pause(&self, duration: Duration) {
        if self.is_active() && !duration.is_zero() {
            self.pacer.pause(duration).await;
        }
    }

    /// Type `text` one character at a time around `base` per character
    ///
    /// Returns `false` if delivery was deactivated part way through.
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails
    pub async fn type_text(&mut self, text: &str, base: Duration) -> Result<bool> {
        let mut buf = [0u8; 4];

        for c in text.chars() {
            if !self.is_active() {
                return Ok(false);
            }

            self.out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
            self.out.flush()?;

            let unit = self.rng.gen_range(-0.5..0.5);
            let delay = char_delay(c, base, self.jitter, unit);
            self.pacer.pause(delay).await;
        }

        Ok(true)
    }

    /// Borrow the underlying writer
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// Consume the typist, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
