#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Only the integration tests use these dev-dependencies.
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;

pub mod controller;
pub mod engine;
pub mod error;
pub mod handle;
pub mod progress;

// Re-export key types for convenience
pub use controller::{ControllerConfig, DEFAULT_COMPLETION_RESET_DELAY, PlaybackController};
pub use engine::{SimulatedEngine, SimulatedEngineConfig};
pub use error::VoiceError;
pub use handle::{PlaybackCommand, PlaybackHandle, spawn_controller};
