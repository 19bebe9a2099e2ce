#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Only the test build uses these dev-dependencies.
#[cfg(test)]
use serde_json as _;

pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{PlaybackPhase, PlaybackState, SpeechRequest, Voice, VoiceCatalog};
pub use error::CoreError;
pub use events::{EngineEvent, EngineEventKind, Generation, UtteranceEvents};
pub use ports::{MemoryParameterStore, ParameterStore, SpeechEngine, Utterance, VoiceDiscovery};
pub use settings::{DEFAULT_PITCH, DEFAULT_RATE, ParamKey, parse_numeric_param};
