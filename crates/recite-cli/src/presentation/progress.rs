//! Progress bar and JSON-lines rendering of [`PlaybackState`].

use indicatif::{ProgressBar, ProgressStyle};
use recite_core::{PlaybackPhase, PlaybackState};
use recite_voice::progress::words;

use crate::error::CliError;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}";

/// Encode a state snapshot as one JSON line (camelCase fields).
pub fn json_line(state: &PlaybackState) -> Result<String, CliError> {
    Ok(serde_json::to_string(state)?)
}

/// Short message for the progress bar: the current word, or the phase.
pub fn status_label(state: &PlaybackState, words: &[&str]) -> String {
    match state.phase() {
        PlaybackPhase::Paused => "(paused)".to_string(),
        PlaybackPhase::Idle if state.progress >= 100.0 => "(done)".to_string(),
        PlaybackPhase::Idle => "(stopped)".to_string(),
        PlaybackPhase::Speaking => state
            .current_word_index
            .and_then(|i| words.get(i))
            .map_or_else(String::new, |word| (*word).to_string()),
    }
}

/// Where observed states go.
pub enum StateRenderer {
    /// Interactive progress bar; the message is the word being spoken.
    Bar {
        /// The bar itself.
        bar: ProgressBar,
        /// Words of the utterance, indexed by `current_word_index`.
        words: Vec<String>,
    },
    /// One JSON object per state on stdout.
    Json,
}

impl StateRenderer {
    /// A progress bar over `text`.
    pub fn bar(text: &str) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Self::Bar {
            bar,
            words: words(text).into_iter().map(str::to_string).collect(),
        }
    }

    /// JSON lines on stdout.
    pub const fn json() -> Self {
        Self::Json
    }

    /// Show one state.
    pub fn render(&self, state: &PlaybackState) -> Result<(), CliError> {
        match self {
            Self::Bar { bar, words } => {
                let words: Vec<&str> = words.iter().map(String::as_str).collect();
                bar.set_position(bar_position(state.progress));
                bar.set_message(status_label(state, &words));
            }
            Self::Json => println!("{}", json_line(state)?),
        }
        Ok(())
    }

    /// Print a line without corrupting the bar.
    pub fn note(&self, message: &str) {
        match self {
            Self::Bar { bar, .. } => bar.println(message),
            Self::Json => eprintln!("{message}"),
        }
    }

    /// Leave the final state on screen.
    pub fn finish(&self, state: &PlaybackState) {
        if let Self::Bar { bar, .. } = self {
            bar.set_position(bar_position(state.progress));
            bar.finish();
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_position(progress: f64) -> u64 {
    progress.clamp(0.0, 100.0).round() as u64
}
