//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `execute(ctx: &CliContext, ...) -> Result<_, CliError>`
//! - Thin wrappers that:
//!   1. Validate CLI-specific input
//!   2. Drive the playback handle or query the engine
//!   3. Format output through [`presentation`](crate::presentation)
//!
//! Handlers never build stores, engines or controllers; bootstrap does.

pub mod speak;
pub mod voices;
