//! `recite voices`: list the engine's voice catalog.

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::format_voice_row;

/// Print every voice, as a table or as a JSON array.
pub fn execute(ctx: &CliContext, json: bool) -> Result<(), CliError> {
    let voices = ctx.voices();

    if json {
        println!("{}", serde_json::to_string_pretty(&voices)?);
        return Ok(());
    }

    if voices.is_empty() {
        println!("No voices available.");
        return Ok(());
    }
    for voice in &voices {
        println!("{}", format_voice_row(voice));
    }
    Ok(())
}
