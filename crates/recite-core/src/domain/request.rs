use crate::settings::{DEFAULT_PITCH, DEFAULT_RATE};

use super::Voice;

/// One synthesis request, built fresh for every submitted utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// Text to speak.
    pub text: String,

    /// Rate multiplier (1.0 = engine default pace).
    pub rate: f32,

    /// Pitch multiplier (1.0 = engine default pitch).
    pub pitch: f32,

    /// Voice override; `None` means the engine's default voice.
    pub voice: Option<Voice>,
}

impl SpeechRequest {
    /// A request for `text` with default rate and pitch and no voice override.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
            voice: None,
        }
    }

    /// Length of the text in Unicode scalar values.
    ///
    /// Boundary offsets reported by engines are counted in the same unit.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
