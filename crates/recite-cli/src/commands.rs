//! Subcommands of the `recite` binary.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Speak text and show progress until it finishes
    Speak {
        /// Text to speak (defaults to a short greeting)
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Speaking rate multiplier; non-numeric values mean 1
        #[arg(long, env = "RECITE_RATE")]
        rate: Option<String>,

        /// Pitch multiplier; non-numeric values mean 1
        #[arg(long, env = "RECITE_PITCH")]
        pitch: Option<String>,

        /// Voice name (see `recite voices`)
        #[arg(long, env = "RECITE_VOICE")]
        voice: Option<String>,

        /// Print one JSON state per line instead of a progress bar
        #[arg(long)]
        json: bool,

        /// Read p/s/r/q commands from stdin while speaking
        #[arg(short, long)]
        interactive: bool,
    },

    /// List the voices the engine offers
    Voices {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}
