//! Voice catalog listing.

use recite_core::Voice;

/// One aligned table row: name, language, engine handle.
pub fn format_voice_row(voice: &Voice) -> String {
    format!(
        "{:<12} {:<8} {}",
        voice.name,
        voice.lang.as_deref().unwrap_or("-"),
        voice.handle
    )
}
