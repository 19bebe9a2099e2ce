//! Shared fixtures for the controller integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use recite_core::{
    MemoryParameterStore, ParamKey, ParameterStore, SpeechEngine, SpeechRequest, Utterance, UtteranceEvents,
};
use recite_voice::{ControllerConfig, PlaybackController};

/// An engine that records every call and only reports events when told to.
#[derive(Default)]
pub struct FakeEngine {
    inner: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    utterances: Vec<Utterance>,
    speaking: bool,
    paused: bool,
    cancels: usize,
    pauses: usize,
    resumes: usize,
}

impl FakeEngine {
    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.inner
            .lock()
            .unwrap()
            .utterances
            .iter()
            .map(|u| u.request.clone())
            .collect()
    }

    /// Callback surface of the `n`th submitted utterance.
    pub fn events(&self, n: usize) -> UtteranceEvents {
        self.inner.lock().unwrap().utterances[n].events.clone()
    }

    /// Callback surface of the most recent utterance.
    pub fn last_events(&self) -> UtteranceEvents {
        let inner = self.inner.lock().unwrap();
        inner.utterances.last().expect("nothing spoken yet").events.clone()
    }

    /// Finish the most recent utterance the way a real engine would.
    pub fn finish_last(&self) {
        let events = self.last_events();
        {
            let mut inner = self.inner.lock().unwrap();
            inner.speaking = false;
            inner.paused = false;
        }
        events.ended();
    }

    pub fn cancel_count(&self) -> usize {
        self.inner.lock().unwrap().cancels
    }

    pub fn pause_count(&self) -> usize {
        self.inner.lock().unwrap().pauses
    }

    pub fn resume_count(&self) -> usize {
        self.inner.lock().unwrap().resumes
    }
}

impl SpeechEngine for FakeEngine {
    fn speak(&self, utterance: Utterance) {
        let mut inner = self.inner.lock().unwrap();
        inner.utterances.push(utterance);
        inner.speaking = true;
        inner.paused = false;
    }

    fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.cancels += 1;
        inner.speaking = false;
        inner.paused = false;
    }

    fn pause(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.pauses += 1;
        inner.paused = true;
    }

    fn resume(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.resumes += 1;
        inner.paused = false;
    }

    fn is_speaking(&self) -> bool {
        self.inner.lock().unwrap().speaking
    }

    fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }
}

/// A controller over a [`FakeEngine`] and a store seeded with `text`.
pub fn controller_with_text(
    text: &str,
) -> (PlaybackController, Arc<FakeEngine>, Arc<MemoryParameterStore>) {
    let store = Arc::new(MemoryParameterStore::with_params([(ParamKey::Text, text)]));
    let engine = Arc::new(FakeEngine::default());
    let controller = PlaybackController::new(
        Arc::clone(&store) as Arc<dyn ParameterStore>,
        Arc::clone(&engine) as Arc<dyn SpeechEngine>,
        ControllerConfig::default(),
    );
    (controller, engine, store)
}
