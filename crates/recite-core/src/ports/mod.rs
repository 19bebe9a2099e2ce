//! Port definitions (trait abstractions) for the controller's collaborators.
//!
//! Ports define the interfaces the playback controller expects from the
//! outside world. They contain no implementation details and use only domain
//! types.
//!
//! # Design Rules
//!
//! - All methods are synchronous and non-blocking
//! - Engines report lifecycle progress only through [`UtteranceEvents`](crate::events::UtteranceEvents)
//! - Stores deal in strings; typing happens in the controller

pub mod parameter_store;
pub mod speech_engine;

pub use parameter_store::{MemoryParameterStore, ParameterStore};
pub use speech_engine::{SpeechEngine, Utterance, VoiceDiscovery};
