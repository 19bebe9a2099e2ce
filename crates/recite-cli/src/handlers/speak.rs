//! `recite speak`: seed the store, start playback, render until it ends.

use std::path::{Path, PathBuf};

use recite_core::{ParamKey, PlaybackState};
use recite_voice::PlaybackHandle;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::StateRenderer;

/// Spoken when neither text nor a file is given.
pub const DEFAULT_TEXT: &str = "Hello! I love JavaScript 👍";

/// Arguments for `recite speak`.
#[derive(Debug, Clone, Default)]
pub struct SpeakArgs {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub voice: Option<String>,
    pub json: bool,
    pub interactive: bool,
}

/// A line typed on stdin during `--interactive` playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// `p`: pause or resume.
    TogglePause,
    /// `s`: stop, keeping the position on screen.
    Stop,
    /// `r`: restart from the beginning.
    Restart,
    /// `q`: quit.
    Quit,
}

impl KeyCommand {
    /// Parse one input line; unknown input is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" => Some(Self::TogglePause),
            "s" => Some(Self::Stop),
            "r" => Some(Self::Restart),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// How a speak session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The utterance played to the end.
    Completed,
    /// The engine reported an error.
    Failed,
    /// The user typed `q`.
    Quit,
}

/// Pick the text to speak: a file wins over the argument, then the default.
pub fn resolve_text(text: Option<String>, file: Option<&Path>) -> Result<String, CliError> {
    match (text, file) {
        (_, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display()))),
        (Some(text), None) => Ok(text),
        (None, None) => Ok(DEFAULT_TEXT.to_string()),
    }
}

/// Speak and render until playback ends. Returns the last observed state.
pub async fn execute(ctx: &CliContext, args: SpeakArgs) -> Result<PlaybackState, CliError> {
    let text = resolve_text(args.text, args.file.as_deref())?;

    ctx.seed(ParamKey::Text, &text);
    for (key, value) in [
        (ParamKey::Rate, &args.rate),
        (ParamKey::Pitch, &args.pitch),
        (ParamKey::Voice, &args.voice),
    ] {
        if let Some(value) = value {
            ctx.seed(key, value);
        }
    }
    if let Some(name) = &args.voice {
        if !ctx.voices().iter().any(|v| &v.name == name) {
            tracing::warn!(voice = %name, "Unknown voice, using the engine default");
        }
    }

    let renderer = if args.json {
        StateRenderer::json()
    } else {
        StateRenderer::bar(&text)
    };

    let (handle, task) = ctx.spawn_playback()?;
    let mut rx = handle.subscribe();
    handle.toggle(true)?;

    let outcome = watch_playback(&handle, &mut rx, &renderer, args.interactive).await;

    handle.shutdown()?;
    task.await
        .map_err(|e| CliError::Playback(format!("controller task failed: {e}")))?;

    let (state, ending) = outcome?;
    renderer.finish(&state);
    tracing::debug!(?ending, progress = state.progress, "Speak session over");

    match ending {
        Ending::Failed => Err(CliError::Playback("speech synthesis failed".to_string())),
        Ending::Completed | Ending::Quit => Ok(state),
    }
}

async fn watch_playback(
    handle: &PlaybackHandle,
    rx: &mut watch::Receiver<PlaybackState>,
    renderer: &StateRenderer,
    interactive: bool,
) -> Result<(PlaybackState, Ending), CliError> {
    let mut input = interactive.then(|| BufReader::new(tokio::io::stdin()).lines());
    if interactive {
        renderer.note("p = pause/resume, s = stop, r = restart, q = quit");
    }

    // The first change is the submit; everything after is playback.
    rx.changed().await.map_err(|_| closed())?;
    let mut state = *rx.borrow_and_update();
    let mut session = SessionTracker::default();
    renderer.render(&state)?;

    loop {
        if let Some(ending) = session.observe(&state) {
            return Ok((state, ending));
        }

        tokio::select! {
            changed = rx.changed() => {
                changed.map_err(|_| closed())?;
                state = *rx.borrow_and_update();
                renderer.render(&state)?;
            }
            line = next_line(&mut input) => {
                let Some(command) = line.as_deref().and_then(KeyCommand::parse) else {
                    continue;
                };
                match command {
                    KeyCommand::TogglePause => handle.toggle_pause()?,
                    KeyCommand::Stop => {
                        session.stopped();
                        handle.toggle(false)?;
                        renderer.note("stopped (r = restart, q = quit)");
                    }
                    KeyCommand::Restart => {
                        session.restarted();
                        handle.toggle(true)?;
                        // A restart that lands on an identical state publishes nothing.
                        state = handle.state();
                        renderer.render(&state)?;
                    }
                    KeyCommand::Quit => return Ok((state, Ending::Quit)),
                }
            }
        }
    }
}

/// Decides when an observed state ends the session.
///
/// Silence after a user stop is not an ending, and neither is the stopped
/// state still visible right after a restart was requested.
#[derive(Debug, Default)]
pub struct SessionTracker {
    user_stopped: bool,
    awaiting_restart: bool,
}

impl SessionTracker {
    /// The user stopped playback.
    pub fn stopped(&mut self) {
        self.user_stopped = true;
    }

    /// The user asked to restart; wait until speech is seen again.
    pub fn restarted(&mut self) {
        self.user_stopped = false;
        self.awaiting_restart = true;
    }

    /// Fold one observed state, returning how the session ended if it did.
    pub fn observe(&mut self, state: &PlaybackState) -> Option<Ending> {
        if state.is_speaking {
            self.awaiting_restart = false;
            return None;
        }
        if self.user_stopped || self.awaiting_restart {
            return None;
        }
        Some(if state.progress >= 100.0 {
            Ending::Completed
        } else {
            Ending::Failed
        })
    }
}

/// Next stdin line, or never when input is off or exhausted.
async fn next_line(input: &mut Option<Lines<BufReader<Stdin>>>) -> Option<String> {
    let Some(lines) = input.as_mut() else {
        return std::future::pending().await;
    };
    let result = lines.next_line().await;
    match result {
        Ok(Some(line)) => Some(line),
        Ok(None) | Err(_) => {
            *input = None;
            None
        }
    }
}

fn closed() -> CliError {
    CliError::Playback("playback controller stopped unexpectedly".to_string())
}
