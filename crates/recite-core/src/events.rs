//! Engine lifecycle events and the generation tag that guards them.
//!
//! Every submitted utterance gets a fresh [`Generation`]. The engine reports
//! progress through the [`UtteranceEvents`] it was handed, which stamps each
//! event with that generation. The controller drops any event whose
//! generation is no longer current, so a late callback from a cancelled
//! utterance can never touch the state of a newer one.

use std::fmt;

use tokio::sync::mpsc;

/// Monotonically increasing tag identifying one submitted utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The generation before any utterance was submitted.
    pub const INITIAL: Self = Self(0);

    /// The generation that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    /// Audio output began.
    Started,

    /// A word boundary was crossed at `char_index` (Unicode scalar values
    /// from the start of the utterance text).
    Boundary {
        /// Offset of the boundary in the utterance text.
        char_index: usize,
    },

    /// The utterance finished playing.
    Ended,

    /// Synthesis failed or was rejected by the platform.
    Failed {
        /// Engine-provided description, for logs only.
        reason: String,
    },
}

/// An engine event tagged with the generation of the utterance it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    /// Utterance the event belongs to.
    pub generation: Generation,
    /// The event itself.
    pub kind: EngineEventKind,
}

impl EngineEvent {
    /// Tag `kind` with `generation`.
    #[must_use]
    pub const fn new(generation: Generation, kind: EngineEventKind) -> Self {
        Self { generation, kind }
    }
}

/// The callback surface handed to an engine with each utterance.
///
/// Cheap to clone; engines may move clones into background tasks. Sending
/// never blocks, and events sent after the controller is gone are dropped.
#[derive(Debug, Clone)]
pub struct UtteranceEvents {
    generation: Generation,
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl UtteranceEvents {
    /// Create a callback surface that reports into `tx` under `generation`.
    #[must_use]
    pub const fn new(generation: Generation, tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { generation, tx }
    }

    /// Generation of the utterance these callbacks belong to.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Report that audio output began.
    pub fn started(&self) {
        self.send(EngineEventKind::Started);
    }

    /// Report a word boundary at `char_index`.
    pub fn boundary(&self, char_index: usize) {
        self.send(EngineEventKind::Boundary { char_index });
    }

    /// Report natural completion.
    pub fn ended(&self) {
        self.send(EngineEventKind::Ended);
    }

    /// Report a synthesis failure.
    pub fn failed(&self, reason: impl Into<String>) {
        self.send(EngineEventKind::Failed {
            reason: reason.into(),
        });
    }

    fn send(&self, kind: EngineEventKind) {
        if self.tx.send(EngineEvent::new(self.generation, kind)).is_err() {
            tracing::debug!(generation = %self.generation, "Controller gone, engine event dropped");
        }
    }
}
