//! Speech parameter keys and value parsing.
//!
//! Parameters live in an external [`ParameterStore`](crate::ports::ParameterStore)
//! as plain strings. This module names the keys and turns stored strings into
//! the numeric values a [`SpeechRequest`](crate::domain::SpeechRequest) needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Rate used when the store has no usable `rate` value.
pub const DEFAULT_RATE: f32 = 1.0;

/// Pitch used when the store has no usable `pitch` value.
pub const DEFAULT_PITCH: f32 = 1.0;

/// The four parameters the controller reads from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKey {
    /// The text to speak.
    Text,
    /// Speaking rate multiplier.
    Rate,
    /// Pitch multiplier.
    Pitch,
    /// Voice name, matched exactly against the voice catalog.
    Voice,
}

impl ParamKey {
    /// Every key, in store order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Rate, Self::Pitch, Self::Voice];

    /// The key's name in the parameter store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Rate => "rate",
            Self::Pitch => "pitch",
            Self::Voice => "voice",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CoreError::UnknownParameter(s.to_string()))
    }
}

/// Parse a stored numeric parameter, falling back to `default`.
///
/// Absent, empty, non-numeric and non-finite values all yield `default`;
/// none of them is an error.
#[must_use]
pub fn parse_numeric_param(raw: Option<&str>, default: f32) -> f32 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}
