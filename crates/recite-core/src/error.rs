//! Core error types.

use thiserror::Error;

/// Semantic errors raised by the core domain.
///
/// Playback itself never fails at this layer: missing or malformed numeric
/// parameters fall back to defaults and an unmatched voice name means the
/// engine default. These errors only surface when an adapter hands the core
/// something it cannot interpret at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A parameter name that is not one of `text`, `rate`, `pitch`, `voice`.
    #[error("Unknown parameter '{0}' (expected one of: text, rate, pitch, voice)")]
    UnknownParameter(String),
}
