//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the CLI wires concrete
//! implementations together:
//! - Parameter store (`MemoryParameterStore` from recite-core)
//! - Speech engine (`SimulatedEngine` from recite-voice)
//! - Playback controller and its task (recite-voice)
//!
//! Handlers receive a [`CliContext`] and never construct these themselves.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use recite_core::{MemoryParameterStore, ParamKey, ParameterStore, Voice, VoiceDiscovery};
use recite_voice::{
    ControllerConfig, DEFAULT_COMPLETION_RESET_DELAY, PlaybackController, PlaybackHandle,
    SimulatedEngine, SimulatedEngineConfig, spawn_controller,
};
use tokio::task::JoinHandle;

use crate::error::CliError;

/// Environment variable for the simulated reading pace.
pub const WPM_ENV: &str = "RECITE_WPM";

/// Environment variable for the post-completion reset delay, in milliseconds.
pub const RESET_DELAY_ENV: &str = "RECITE_RESET_DELAY_MS";

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Words per minute at rate 1.
    pub words_per_minute: u32,
    /// How long a finished utterance keeps showing 100%.
    pub completion_reset_delay: Duration,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            words_per_minute: recite_voice::engine::DEFAULT_WORDS_PER_MINUTE,
            completion_reset_delay: DEFAULT_COMPLETION_RESET_DELAY,
        }
    }
}

impl CliConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(WPM_ENV) {
            config.words_per_minute = parse_var(WPM_ENV, &raw)?;
        }
        if let Some(raw) = lookup(RESET_DELAY_ENV) {
            config.completion_reset_delay = Duration::from_millis(parse_var(RESET_DELAY_ENV, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values playback cannot run with.
    ///
    /// The finished state must stay published for a nonzero time, or a
    /// completed utterance reads as a failed one.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.words_per_minute == 0 {
            return Err(CliError::Config(format!("{WPM_ENV} must be positive")));
        }
        if self.completion_reset_delay.is_zero() {
            return Err(CliError::Config(format!("{RESET_DELAY_ENV} must be positive")));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| CliError::Config(format!("{key}={raw:?}: {e}")))
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// Parameter store shared with the controller.
    pub store: Arc<MemoryParameterStore>,
    /// Speech engine shared with the controller.
    pub engine: Arc<SimulatedEngine>,
    config: CliConfig,
}

impl CliContext {
    /// Voices the engine offers.
    pub fn voices(&self) -> Vec<Voice> {
        self.engine.voices()
    }

    /// Write a parameter to the store without starting playback.
    pub fn seed(&self, key: ParamKey, value: &str) {
        self.store.set(key.as_str(), value);
    }

    /// Create a controller over this context and run it on its own task.
    ///
    /// The engine's voices are loaded into the controller before it starts.
    pub fn spawn_playback(&self) -> Result<(PlaybackHandle, JoinHandle<()>), CliError> {
        let controller = PlaybackController::new(
            Arc::clone(&self.store) as Arc<dyn ParameterStore>,
            Arc::clone(&self.engine) as Arc<dyn recite_core::SpeechEngine>,
            ControllerConfig {
                completion_reset_delay: self.config.completion_reset_delay,
            },
        );
        let (handle, task) = spawn_controller(controller);
        handle.set_voices(self.voices())?;
        Ok((handle, task))
    }
}

/// Build the CLI context. Must run inside the tokio runtime.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    config.validate()?;
    let engine = SimulatedEngine::new(SimulatedEngineConfig {
        words_per_minute: config.words_per_minute,
    })?;
    tracing::debug!(?config, "CLI context ready");

    Ok(CliContext {
        store: Arc::new(MemoryParameterStore::new()),
        engine: Arc::new(engine),
        config,
    })
}
