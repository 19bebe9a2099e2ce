use serde::{Deserialize, Serialize};

/// Coarse playback phase derived from a [`PlaybackState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// Nothing is being spoken.
    Idle,
    /// An utterance is playing.
    Speaking,
    /// An utterance is suspended mid-way.
    Paused,
}

/// The observable playback state published to UI subscribers.
///
/// The whole tuple is replaced at once on every transition, so an observer
/// never sees `is_speaking` from one event combined with `progress` from
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// An utterance is active (possibly paused).
    pub is_speaking: bool,

    /// The active utterance is suspended. Can be true together with `is_speaking`.
    pub is_paused: bool,

    /// Percent of the current utterance's text already spoken, 0–100.
    pub progress: f64,

    /// Index of the word currently being spoken; `None` when no word is active.
    pub current_word_index: Option<usize>,
}

impl PlaybackState {
    /// Nothing playing, no progress, no active word.
    pub const IDLE: Self = Self {
        is_speaking: false,
        is_paused: false,
        progress: 0.0,
        current_word_index: None,
    };

    /// Derive the coarse phase.
    #[must_use]
    pub const fn phase(&self) -> PlaybackPhase {
        if self.is_paused {
            PlaybackPhase::Paused
        } else if self.is_speaking {
            PlaybackPhase::Speaking
        } else {
            PlaybackPhase::Idle
        }
    }

    /// The word index with `-1` standing for "no active word".
    #[must_use]
    pub fn word_index_or_sentinel(&self) -> i64 {
        self.current_word_index
            .and_then(|i| i64::try_from(i).ok())
            .unwrap_or(-1)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::IDLE
    }
}
