//! Speech engine implementations.
//!
//! The controller drives any [`SpeechEngine`](recite_core::SpeechEngine)
//! through a trait object, so platform engines can be swapped in without
//! touching the controller.
//!
//! ## Engines
//!
//! | Module          | Audio | Boundaries | Voices            |
//! |-----------------|-------|------------|-------------------|
//! | [`simulated`]   |       |  timed     | built-in catalog  |

pub mod simulated;

pub use simulated::{
    DEFAULT_WORDS_PER_MINUTE, SimulatedEngine, SimulatedEngineConfig, builtin_voices,
};
