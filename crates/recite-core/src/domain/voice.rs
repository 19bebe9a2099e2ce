use serde::{Deserialize, Serialize};

/// A voice offered by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Human-readable name; the parameter store refers to voices by this.
    pub name: String,

    /// Engine-specific identifier passed back to the engine on submit.
    pub handle: String,

    /// BCP 47 language tag, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Voice {
    /// Convenience constructor without a language tag.
    #[must_use]
    pub fn new(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            lang: None,
        }
    }

    /// Attach a language tag.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

/// The voices currently known to the controller, used for name lookup only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: Vec<Voice>,
}

impl VoiceCatalog {
    /// Build a catalog from a discovered voice list.
    #[must_use]
    pub const fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }

    /// Replace the whole catalog.
    pub fn replace(&mut self, voices: Vec<Voice>) {
        self.voices = voices;
    }

    /// Find a voice by exact name. The first match wins.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.name == name)
    }

    /// Number of voices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Whether no voices have been discovered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Iterate over the voices in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Voice> {
        self.voices.iter()
    }
}

impl From<Vec<Voice>> for VoiceCatalog {
    fn from(voices: Vec<Voice>) -> Self {
        Self::new(voices)
    }
}
