//! Speech engine and voice discovery trait definitions.

use crate::domain::{SpeechRequest, Voice};
use crate::events::UtteranceEvents;

/// A request handed to the engine together with its callback surface.
#[derive(Debug, Clone)]
pub struct Utterance {
    /// What to speak and how.
    pub request: SpeechRequest,

    /// Where the engine reports `started`, `boundary`, `ended` and `failed`.
    pub events: UtteranceEvents,
}

/// Backend-agnostic text-to-speech engine with Web-Speech-style controls.
///
/// Playback runs asynchronously: `speak` returns immediately and lifecycle
/// callbacks arrive later through the utterance's [`UtteranceEvents`].
///
/// # Contract
///
/// - `cancel` stops the live utterance. Engines should suppress any further
///   callbacks from it; the controller additionally discards stale events by
///   generation, so engines that cannot guarantee this remain correct.
/// - `pause`/`resume` act on the live utterance only and are no-ops otherwise.
/// - `is_speaking` stays true while an utterance is live, paused or not.
pub trait SpeechEngine: Send + Sync {
    /// Queue an utterance for playback.
    fn speak(&self, utterance: Utterance);

    /// Stop the live utterance, if any.
    fn cancel(&self);

    /// Suspend the live utterance.
    fn pause(&self);

    /// Continue a suspended utterance.
    fn resume(&self);

    /// Whether an utterance is live.
    fn is_speaking(&self) -> bool;

    /// Whether the live utterance is suspended.
    fn is_paused(&self) -> bool;
}

/// Source of the voices an engine offers.
///
/// Discovery may complete at any time relative to playback; callers forward
/// the result to the controller's `set_voices`.
pub trait VoiceDiscovery: Send + Sync {
    /// Voices currently available.
    fn voices(&self) -> Vec<Voice>;
}
