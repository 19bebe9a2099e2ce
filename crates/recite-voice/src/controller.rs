//! Playback controller: drives a speech engine and folds its events into state.
//!
//! The controller is a per-utterance state machine:
//!
//! ```text
//!   idle ──submit──▶ active(0%, word 0) ──boundary(c)──▶ active(c/len, word(c))
//!                      │    ▲                                │
//!                pause │    │ resume                    end  │  error
//!                      ▼    │                                ▼    └──▶ idle (immediate)
//!                     paused                          completed(100%) ──1s──▶ idle
//! ```
//!
//! Commands (`toggle`, `pause`, `resume`, parameter updates) run synchronously
//! on the caller's stack. Engine callbacks arrive later on an internal channel
//! and are applied by [`PlaybackController::process_pending`] or
//! [`PlaybackController::next_event`]. Each callback carries the
//! [`Generation`] of its utterance; callbacks from superseded utterances are
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use recite_core::{
    CoreError, DEFAULT_PITCH, DEFAULT_RATE, EngineEvent, EngineEventKind, Generation, ParamKey,
    ParameterStore, PlaybackState, SpeechEngine, SpeechRequest, Utterance, UtteranceEvents, Voice,
    VoiceCatalog, parse_numeric_param,
};

use crate::progress;

/// How long a completed utterance keeps showing 100% before resetting to idle.
pub const DEFAULT_COMPLETION_RESET_DELAY: Duration = Duration::from_millis(1000);

// ── Configuration ──────────────────────────────────────────────────

/// Configuration for the playback controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Delay between natural completion and the reset of progress to 0.
    pub completion_reset_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            completion_reset_delay: DEFAULT_COMPLETION_RESET_DELAY,
        }
    }
}

// ── Internal bookkeeping ───────────────────────────────────────────

/// Text of the utterance the engine currently owns, for boundary math.
#[derive(Debug)]
struct LiveUtterance {
    text: String,
    char_len: usize,
}

/// The one-shot reset scheduled by a natural completion.
#[derive(Debug, Clone, Copy)]
struct PendingReset {
    generation: Generation,
    deadline: Instant,
}

// ── Controller ─────────────────────────────────────────────────────

/// Owns the speech engine handle and the observable [`PlaybackState`].
///
/// State is published through a `watch` channel: subscribers always see the
/// latest complete state, including subscribers that join late.
pub struct PlaybackController {
    /// Where `text`, `rate`, `pitch` and `voice` live.
    store: Arc<dyn ParameterStore>,

    /// The synthesis engine.
    engine: Arc<dyn SpeechEngine>,

    /// Voices available for name lookup on the next request.
    voices: VoiceCatalog,

    /// Generation of the most recent submit or stop.
    generation: Generation,

    /// The utterance the engine is playing, if any.
    live: Option<LiveUtterance>,

    /// Post-completion reset waiting for its deadline.
    pending_reset: Option<PendingReset>,

    /// Publishes the full state tuple on every transition.
    state_tx: watch::Sender<PlaybackState>,

    /// Cloned into every utterance's callback surface.
    event_tx: mpsc::UnboundedSender<EngineEvent>,

    /// Engine callbacks waiting to be applied.
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,

    config: ControllerConfig,
}

impl PlaybackController {
    /// Create a controller in the idle state.
    pub fn new(
        store: Arc<dyn ParameterStore>,
        engine: Arc<dyn SpeechEngine>,
        config: ControllerConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::IDLE);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            store,
            engine,
            voices: VoiceCatalog::default(),
            generation: Generation::INITIAL,
            live: None,
            pending_reset: None,
            state_tx,
            event_tx,
            event_rx,
            config,
        }
    }

    /// Subscribe to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> PlaybackState {
        *self.state_tx.borrow()
    }

    /// Generation of the most recent submit or stop.
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Voices currently available for lookup.
    pub const fn voices(&self) -> &VoiceCatalog {
        &self.voices
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Store a parameter, then restart playback with the current text.
    ///
    /// Behaves exactly like `toggle(true)` after the write, including the
    /// resume-in-place fast path while paused.
    pub fn update_parameter(&mut self, key: ParamKey, value: &str) {
        tracing::debug!(%key, "Parameter updated");
        self.store.set(key.as_str(), value);
        self.toggle(true);
    }

    /// [`update_parameter`](Self::update_parameter) by store name.
    ///
    /// Unknown names are rejected before anything is written.
    pub fn update_parameter_named(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        let key = name.parse::<ParamKey>()?;
        self.update_parameter(key, value);
        Ok(())
    }

    /// Select a voice by name and restart playback.
    pub fn update_voice(&mut self, name: &str) {
        self.update_parameter(ParamKey::Voice, name);
    }

    /// Replace the voice catalog.
    ///
    /// The live utterance keeps the voice it was submitted with; the new
    /// catalog applies from the next request.
    pub fn set_voices(&mut self, voices: Vec<Voice>) {
        tracing::debug!(count = voices.len(), "Voice catalog replaced");
        self.voices.replace(voices);
    }

    /// Start over (`true`) or stop (`false`).
    ///
    /// While paused, `toggle(true)` resumes in place instead of restarting.
    /// Otherwise the live utterance is cancelled first. Stopping leaves
    /// `progress` and `current_word_index` at their last values.
    pub fn toggle(&mut self, start_over: bool) {
        if start_over && self.state().is_paused {
            tracing::debug!("Paused: resuming in place instead of restarting");
            self.resume();
            return;
        }

        self.engine.cancel();
        self.generation = self.generation.next();
        self.pending_reset = None;
        self.live = None;

        if start_over {
            self.submit();
        } else {
            tracing::info!(generation = %self.generation, "Playback stopped");
            self.update(|state| {
                state.is_speaking = false;
                state.is_paused = false;
            });
        }
    }

    /// Suspend playback. No-op unless the engine is speaking and not paused.
    pub fn pause(&mut self) {
        if !self.engine.is_speaking() || self.engine.is_paused() {
            tracing::debug!("Pause ignored: engine is not actively speaking");
            return;
        }

        self.engine.pause();
        self.update(|state| state.is_paused = true);
    }

    /// Continue playback. No-op unless the engine is speaking and paused.
    pub fn resume(&mut self) {
        if !self.engine.is_speaking() || !self.engine.is_paused() {
            tracing::debug!("Resume ignored: engine is not paused");
            return;
        }

        self.engine.resume();
        self.update(|state| state.is_paused = false);
    }

    /// Resume when paused, pause otherwise.
    pub fn toggle_pause(&mut self) {
        if self.state().is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    // ── Request construction ───────────────────────────────────────

    /// Build a request from the current store values and voice catalog.
    ///
    /// Missing or non-numeric `rate`/`pitch` fall back to 1. A voice name
    /// with no exact match in the catalog means the engine default voice.
    pub fn make_request(&self) -> SpeechRequest {
        let get = |key: ParamKey| self.store.get(key.as_str());

        let text = get(ParamKey::Text).unwrap_or_default();
        let rate = parse_numeric_param(get(ParamKey::Rate).as_deref(), DEFAULT_RATE);
        let pitch = parse_numeric_param(get(ParamKey::Pitch).as_deref(), DEFAULT_PITCH);

        let voice_name = get(ParamKey::Voice).unwrap_or_default();
        let voice = self.voices.find(&voice_name).cloned();
        if voice.is_none() && !voice_name.is_empty() {
            tracing::debug!(voice = %voice_name, "Voice not in catalog, using engine default");
        }

        SpeechRequest {
            text,
            rate,
            pitch,
            voice,
        }
    }

    fn submit(&mut self) {
        let request = self.make_request();
        let char_len = request.char_len();
        let has_words = !progress::words(&request.text).is_empty();

        tracing::info!(
            generation = %self.generation,
            chars = char_len,
            rate = request.rate,
            pitch = request.pitch,
            voice = request.voice.as_ref().map(|v| v.name.as_str()),
            "Submitting utterance"
        );

        self.live = Some(LiveUtterance {
            text: request.text.clone(),
            char_len,
        });
        self.engine.speak(Utterance {
            request,
            events: UtteranceEvents::new(self.generation, self.event_tx.clone()),
        });

        self.update(|state| {
            state.is_speaking = true;
            state.is_paused = false;
            state.progress = 0.0;
            state.current_word_index = has_words.then_some(0);
        });
    }

    // ── Engine events ──────────────────────────────────────────────

    /// Apply one engine event. Events from superseded generations are dropped.
    pub fn handle_event(&mut self, event: EngineEvent) {
        if event.generation != self.generation {
            tracing::debug!(
                event_generation = %event.generation,
                current = %self.generation,
                kind = ?event.kind,
                "Dropping stale engine event"
            );
            return;
        }

        match event.kind {
            EngineEventKind::Started => {
                let has_words = self
                    .live
                    .as_ref()
                    .is_some_and(|live| !progress::words(&live.text).is_empty());
                self.update(|state| {
                    state.progress = 0.0;
                    state.current_word_index = has_words.then_some(0);
                });
            }

            EngineEventKind::Boundary { char_index } => {
                let Some(live) = self.live.as_ref() else {
                    return;
                };
                let Some(percent) = progress::progress_percent(char_index, live.char_len) else {
                    tracing::trace!(char_index, "Boundary on empty text ignored");
                    return;
                };
                let word = progress::word_index(&live.text, char_index);
                self.update(|state| {
                    state.progress = percent;
                    state.current_word_index = Some(word);
                });
            }

            EngineEventKind::Ended => {
                tracing::info!(generation = %self.generation, "Utterance finished");
                self.live = None;
                self.update(|state| {
                    *state = PlaybackState {
                        is_speaking: false,
                        is_paused: false,
                        progress: 100.0,
                        current_word_index: None,
                    };
                });
                self.pending_reset = Some(PendingReset {
                    generation: self.generation,
                    deadline: Instant::now() + self.config.completion_reset_delay,
                });
            }

            EngineEventKind::Failed { reason } => {
                tracing::warn!(generation = %self.generation, %reason, "Speech synthesis failed");
                self.live = None;
                self.pending_reset = None;
                self.update(|state| *state = PlaybackState::IDLE);
            }
        }
    }

    /// Apply every engine event already queued, plus a due completion reset.
    ///
    /// Never waits. Returns how many events and resets were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        if self
            .pending_reset
            .is_some_and(|reset| reset.deadline <= Instant::now())
        {
            self.fire_pending_reset();
            applied += 1;
        }
        applied
    }

    /// Wait for the next engine event or the completion reset, then apply it.
    ///
    /// Cancel-safe: if the future is dropped before completing, nothing is
    /// lost and nothing is applied.
    pub async fn next_event(&mut self) {
        let deadline = self.pending_reset.map(|reset| reset.deadline);

        tokio::select! {
            biased;
            Some(event) = self.event_rx.recv() => self.handle_event(event),
            () = sleep_until_deadline(deadline) => self.fire_pending_reset(),
        }
    }

    fn fire_pending_reset(&mut self) {
        let Some(reset) = self.pending_reset.take() else {
            return;
        };
        if reset.generation != self.generation {
            return;
        }

        tracing::debug!(generation = %reset.generation, "Completion reset");
        self.update(|state| {
            state.progress = 0.0;
            state.current_word_index = None;
        });
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Mutate the state tuple and notify subscribers if anything changed.
    fn update(&self, mutate: impl FnOnce(&mut PlaybackState)) {
        self.state_tx.send_if_modified(|state| {
            let before = *state;
            mutate(state);
            if *state == before {
                return false;
            }
            tracing::debug!(
                speaking = state.is_speaking,
                paused = state.is_paused,
                progress = state.progress,
                word = state.word_index_or_sentinel(),
                "Playback state transition"
            );
            true
        });
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if self.live.is_some() {
            self.engine.cancel();
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
