//! Terminal presentation for playback state and voices.
//!
//! Format-only: nothing here changes playback.

pub mod progress;
pub mod voices;

pub use progress::{StateRenderer, json_line, status_label};
pub use voices::format_voice_row;
