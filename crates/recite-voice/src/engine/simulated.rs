//! Timer-driven engine that "speaks" by emitting boundaries at a reading pace.
//!
//! Each utterance runs as a tokio task that reports `started`, one boundary
//! per word at the word's start offset, then `ended`. Pacing is
//! `words_per_minute` scaled by the request rate. Pitch is accepted and
//! ignored.
//!
//! Cancellation goes through a per-utterance [`CancellationToken`]; a
//! cancelled task reports nothing further.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use recite_core::{SpeechEngine, Utterance, Voice, VoiceDiscovery};

use crate::error::VoiceError;
use crate::progress;

/// Average English reading pace.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 170;

const MIN_RATE: f32 = 0.1;
const MAX_RATE: f32 = 10.0;

/// Pacing configuration for [`SimulatedEngine`].
#[derive(Debug, Clone)]
pub struct SimulatedEngineConfig {
    /// Words per minute at rate 1.0.
    pub words_per_minute: u32,
}

impl Default for SimulatedEngineConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

impl SimulatedEngineConfig {
    /// Time spent on each word at `rate`.
    ///
    /// The rate is clamped to `[0.1, 10]`; non-finite rates count as 1.
    #[must_use]
    pub fn word_delay(&self, rate: f32) -> Duration {
        let rate = if rate.is_finite() { rate } else { 1.0 };
        let wpm = f64::from(self.words_per_minute.max(1)) * f64::from(rate.clamp(MIN_RATE, MAX_RATE));
        Duration::from_secs_f64(60.0 / wpm)
    }
}

/// The voices the simulated engine accepts.
#[must_use]
pub fn builtin_voices() -> Vec<Voice> {
    vec![
        Voice::new("Ava", "sim:en-us:ava").with_lang("en-US"),
        Voice::new("Oliver", "sim:en-gb:oliver").with_lang("en-GB"),
        Voice::new("Léa", "sim:fr-fr:lea").with_lang("fr-FR"),
        Voice::new("Kenji", "sim:ja-jp:kenji").with_lang("ja-JP"),
    ]
}

// ── Shared state ───────────────────────────────────────────────────

struct LiveJob {
    id: u64,
    cancel: CancellationToken,
    paused_tx: watch::Sender<bool>,
}

#[derive(Default)]
struct Shared {
    live: Option<LiveJob>,
    next_id: u64,
}

impl Shared {
    /// Cancel and forget the live job, if any.
    fn cancel_live(&mut self) {
        if let Some(job) = self.live.take() {
            job.cancel.cancel();
        }
    }
}

// ── Engine ─────────────────────────────────────────────────────────

/// A [`SpeechEngine`] that produces timed callbacks without audio.
pub struct SimulatedEngine {
    runtime: Handle,
    config: SimulatedEngineConfig,
    voices: Vec<Voice>,
    shared: Arc<Mutex<Shared>>,
}

impl SimulatedEngine {
    /// Create an engine on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::EngineUnavailable`] outside a tokio runtime.
    pub fn new(config: SimulatedEngineConfig) -> Result<Self, VoiceError> {
        let runtime = Handle::try_current()
            .map_err(|e| VoiceError::EngineUnavailable(format!("no tokio runtime: {e}")))?;
        Ok(Self::with_runtime(runtime, config))
    }

    /// Create an engine that spawns its utterance tasks on `runtime`.
    #[must_use]
    pub fn with_runtime(runtime: Handle, config: SimulatedEngineConfig) -> Self {
        Self {
            runtime,
            config,
            voices: builtin_voices(),
            shared: Arc::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SimulatedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedEngine")
            .field("config", &self.config)
            .field("voices", &self.voices.len())
            .field("speaking", &self.is_speaking())
            .finish_non_exhaustive()
    }
}

impl SpeechEngine for SimulatedEngine {
    fn speak(&self, utterance: Utterance) {
        let mut shared = self.lock();
        shared.cancel_live();

        let unknown_voice = utterance
            .request
            .voice
            .as_ref()
            .filter(|voice| !self.voices.iter().any(|v| v.handle == voice.handle));
        if let Some(voice) = unknown_voice {
            tracing::warn!(handle = %voice.handle, "Simulated engine has no such voice");
            utterance.events.failed(format!("voice-unavailable: {}", voice.handle));
            return;
        }

        shared.next_id += 1;
        let id = shared.next_id;
        let cancel = CancellationToken::new();
        let (paused_tx, paused_rx) = watch::channel(false);
        shared.live = Some(LiveJob {
            id,
            cancel: cancel.clone(),
            paused_tx,
        });
        drop(shared);

        let word_delay = self.config.word_delay(utterance.request.rate);
        tracing::debug!(
            id,
            generation = %utterance.events.generation(),
            ?word_delay,
            "Simulated utterance queued"
        );
        self.runtime.spawn(run_job(
            Arc::clone(&self.shared),
            id,
            cancel,
            paused_rx,
            utterance,
            word_delay,
        ));
    }

    fn cancel(&self) {
        self.lock().cancel_live();
    }

    fn pause(&self) {
        if let Some(job) = &self.lock().live {
            job.paused_tx.send_replace(true);
        }
    }

    fn resume(&self) {
        if let Some(job) = &self.lock().live {
            job.paused_tx.send_replace(false);
        }
    }

    fn is_speaking(&self) -> bool {
        self.lock().live.is_some()
    }

    fn is_paused(&self) -> bool {
        self.lock()
            .live
            .as_ref()
            .is_some_and(|job| *job.paused_tx.borrow())
    }
}

impl VoiceDiscovery for SimulatedEngine {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }
}

// ── Utterance task ─────────────────────────────────────────────────

async fn run_job(
    shared: Arc<Mutex<Shared>>,
    id: u64,
    cancel: CancellationToken,
    mut paused_rx: watch::Receiver<bool>,
    utterance: Utterance,
    word_delay: Duration,
) {
    let Utterance { request, events } = utterance;
    events.started();

    for start in progress::word_starts(&request.text) {
        if !wait_while_paused(&cancel, &mut paused_rx).await {
            return;
        }
        events.boundary(start);

        tokio::select! {
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(word_delay) => {}
        }
    }

    if !wait_while_paused(&cancel, &mut paused_rx).await {
        return;
    }

    {
        let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
        if shared.live.as_ref().is_some_and(|job| job.id == id) {
            shared.live = None;
        }
    }

    if !cancel.is_cancelled() {
        events.ended();
    }
}

/// Block while paused. Returns `false` once the utterance is cancelled.
async fn wait_while_paused(cancel: &CancellationToken, paused_rx: &mut watch::Receiver<bool>) -> bool {
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        if !*paused_rx.borrow_and_update() {
            return true;
        }
        tokio::select! {
            () = cancel.cancelled() => return false,
            changed = paused_rx.changed() => {
                if changed.is_err() {
                    return false;
                }
            }
        }
    }
}
