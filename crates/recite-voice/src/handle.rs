//! Controller task: serialises commands and engine events on one owner.
//!
//! [`spawn_controller`] moves a [`PlaybackController`] onto a dedicated tokio
//! task. Every command and every engine callback is applied by that task, one
//! at a time, so observers on any thread only ever see complete state tuples.
//!
//! The public [`PlaybackHandle`] is the cloneable proxy UI code holds. It
//! exposes the controller's command surface and routes every call through a
//! [`PlaybackCommand`] sent to the task.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use recite_core::{ParamKey, PlaybackState, Voice};

use crate::controller::PlaybackController;
use crate::error::VoiceError;

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from a handle to the controller task.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// Start over (`true`) or stop (`false`).
    Toggle {
        /// Restart from the current store values instead of stopping.
        start_over: bool,
    },

    /// Suspend playback.
    Pause,

    /// Continue suspended playback.
    Resume,

    /// Resume when paused, pause otherwise.
    TogglePause,

    /// Store a parameter and restart.
    UpdateParameter {
        /// Which parameter.
        key: ParamKey,
        /// New value, as stored.
        value: String,
    },

    /// Replace the voice catalog.
    SetVoices(Vec<Voice>),

    /// Stop the task. The controller is dropped, cancelling any live utterance.
    Shutdown,
}

// ── Handle ─────────────────────────────────────────────────────────

/// Cloneable handle to a running controller task.
///
/// Commands are fire-and-forget: they return as soon as the command is
/// queued. Use [`subscribe`](Self::subscribe) to observe the effect.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    cmd_tx: mpsc::UnboundedSender<PlaybackCommand>,
    state_rx: watch::Receiver<PlaybackState>,
}

impl PlaybackHandle {
    /// Start over (`true`) or stop (`false`).
    pub fn toggle(&self, start_over: bool) -> Result<(), VoiceError> {
        self.send(PlaybackCommand::Toggle { start_over })
    }

    /// Suspend playback.
    pub fn pause(&self) -> Result<(), VoiceError> {
        self.send(PlaybackCommand::Pause)
    }

    /// Continue suspended playback.
    pub fn resume(&self) -> Result<(), VoiceError> {
        self.send(PlaybackCommand::Resume)
    }

    /// Resume when paused, pause otherwise.
    pub fn toggle_pause(&self) -> Result<(), VoiceError> {
        self.send(PlaybackCommand::TogglePause)
    }

    /// Store a parameter and restart.
    pub fn update_parameter(
        &self,
        key: ParamKey,
        value: impl Into<String>,
    ) -> Result<(), VoiceError> {
        self.send(PlaybackCommand::UpdateParameter {
            key,
            value: value.into(),
        })
    }

    /// Store a parameter given by its store name (`text`, `rate`, `pitch`, `voice`).
    pub fn update_parameter_named(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), VoiceError> {
        let key = name.parse::<ParamKey>()?;
        self.update_parameter(key, value)
    }

    /// Select a voice by name and restart.
    pub fn update_voice(&self, name: impl Into<String>) -> Result<(), VoiceError> {
        self.update_parameter(ParamKey::Voice, name)
    }

    /// Replace the voice catalog.
    pub fn set_voices(&self, voices: Vec<Voice>) -> Result<(), VoiceError> {
        self.send(PlaybackCommand::SetVoices(voices))
    }

    /// Ask the controller task to exit.
    pub fn shutdown(&self) -> Result<(), VoiceError> {
        self.send(PlaybackCommand::Shutdown)
    }

    /// Subscribe to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_rx.clone()
    }

    /// Latest published state.
    pub fn state(&self) -> PlaybackState {
        *self.state_rx.borrow()
    }

    fn send(&self, command: PlaybackCommand) -> Result<(), VoiceError> {
        self.cmd_tx
            .send(command)
            .map_err(|_| VoiceError::ControllerClosed)
    }
}

// ── Task ───────────────────────────────────────────────────────────

/// Move `controller` onto its own task and return a handle to it.
///
/// Must be called from within a tokio runtime. The task runs until
/// [`PlaybackHandle::shutdown`] is called or every handle is dropped.
pub fn spawn_controller(controller: PlaybackController) -> (PlaybackHandle, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let handle = PlaybackHandle {
        cmd_tx,
        state_rx: controller.subscribe(),
    };
    let task = tokio::spawn(run(controller, cmd_rx));
    (handle, task)
}

async fn run(mut controller: PlaybackController, mut cmd_rx: mpsc::UnboundedReceiver<PlaybackCommand>) {
    tracing::debug!("Playback controller task started");

    loop {
        tokio::select! {
            biased;
            command = cmd_rx.recv() => match command {
                Some(PlaybackCommand::Shutdown) | None => break,
                Some(command) => dispatch(&mut controller, command),
            },
            () = controller.next_event() => {}
        }
    }

    tracing::debug!("Playback controller task exiting");
}

fn dispatch(controller: &mut PlaybackController, command: PlaybackCommand) {
    match command {
        PlaybackCommand::Toggle { start_over } => controller.toggle(start_over),
        PlaybackCommand::Pause => controller.pause(),
        PlaybackCommand::Resume => controller.resume(),
        PlaybackCommand::TogglePause => controller.toggle_pause(),
        PlaybackCommand::UpdateParameter { key, value } => {
            controller.update_parameter(key, &value);
        }
        PlaybackCommand::SetVoices(voices) => controller.set_voices(voices),
        PlaybackCommand::Shutdown => {}
    }
}
