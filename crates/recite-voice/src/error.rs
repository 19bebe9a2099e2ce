//! Voice crate error types.

use recite_core::CoreError;

/// Errors surfaced by the playback handle and engine construction.
///
/// Playback failures themselves are not errors: an engine error resets the
/// observable state to idle and is only visible there.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// The controller task has stopped and no longer accepts commands.
    #[error("Playback controller is not running")]
    ControllerClosed,

    /// The speech engine could not be created.
    #[error("Speech engine unavailable: {0}")]
    EngineUnavailable(String),

    /// A parameter could not be interpreted.
    #[error(transparent)]
    Parameter(#[from] CoreError),
}
