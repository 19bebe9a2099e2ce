//! Domain value types.
//!
//! Pure data with no infrastructure dependencies. The controller owns the
//! only mutable [`PlaybackState`]; everything here is freely cloneable.

mod playback;
mod request;
mod voice;

pub use playback::{PlaybackPhase, PlaybackState};
pub use request::SpeechRequest;
pub use voice::{Voice, VoiceCatalog};
