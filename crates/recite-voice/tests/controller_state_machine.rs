//! Integration tests for the `PlaybackController` state machine.
//!
//! The controller is driven synchronously against a recording fake engine.
//! Engine callbacks are injected through the utterance's callback surface and
//! applied with `process_pending`, so every transition is deterministic.
//! Timer behaviour uses tokio's paused clock.

mod common;

use std::time::Duration;

use mockall::mock;
use recite_core::{
    ParamKey, ParameterStore, PlaybackPhase, PlaybackState, Utterance, Voice,
};
use recite_voice::PlaybackController;

use common::controller_with_text;

fn assert_progress(state: PlaybackState, expected: f64) {
    assert!(
        (state.progress - expected).abs() < 0.05,
        "progress {} != {expected}",
        state.progress
    );
}

/// Start "Hello world" and cross the second word's boundary.
fn speaking_at_second_word() -> (PlaybackController, std::sync::Arc<common::FakeEngine>) {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    engine.last_events().boundary(6);
    controller.process_pending();
    (controller, engine)
}

// ── Submit ─────────────────────────────────────────────────────────

#[test]
fn toggle_submits_store_text() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");

    controller.toggle(true);

    let requests = engine.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Hello world");
    assert_eq!(
        controller.state(),
        PlaybackState {
            is_speaking: true,
            is_paused: false,
            progress: 0.0,
            current_word_index: Some(0),
        }
    );
    assert_eq!(controller.state().phase(), PlaybackPhase::Speaking);
}

#[test]
fn started_event_keeps_submit_state() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    engine.last_events().started();
    assert_eq!(controller.process_pending(), 1);

    let state = controller.state();
    assert!(state.is_speaking);
    assert_progress(state, 0.0);
    assert_eq!(state.current_word_index, Some(0));
}

#[test]
fn restart_cancels_before_resubmitting() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    controller.toggle(true);

    assert_eq!(engine.requests().len(), 2);
    assert_eq!(engine.cancel_count(), 2);
}

// ── Boundaries ─────────────────────────────────────────────────────

#[test]
fn boundary_updates_progress_and_word() {
    let (controller, _engine) = speaking_at_second_word();

    let state = controller.state();
    assert_progress(state, 54.5);
    assert_eq!(state.current_word_index, Some(1));
    assert!(state.is_speaking);
}

#[test]
fn boundary_counts_characters_not_bytes() {
    let (mut controller, engine, _store) = controller_with_text("Hello! I love JavaScript 👍");
    controller.toggle(true);
    engine.last_events().boundary(25);
    controller.process_pending();

    let state = controller.state();
    assert_progress(state, 25.0 / 26.0 * 100.0);
    assert_eq!(state.current_word_index, Some(4));
}

#[test]
fn boundary_on_empty_text_is_ignored() {
    let (mut controller, engine, _store) = controller_with_text("");
    controller.toggle(true);
    assert_eq!(controller.state().current_word_index, None);

    engine.last_events().boundary(0);
    controller.process_pending();

    let state = controller.state();
    assert!(state.is_speaking);
    assert_progress(state, 0.0);
    assert_eq!(state.current_word_index, None);
}

#[test]
fn boundary_past_end_caps_at_100() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    engine.last_events().boundary(40);
    controller.process_pending();

    assert_progress(controller.state(), 100.0);
    assert_eq!(controller.state().current_word_index, Some(1));
}

// ── Completion and reset ───────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn completion_shows_100_then_resets() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    engine.finish_last();
    controller.process_pending();

    assert_eq!(
        controller.state(),
        PlaybackState {
            is_speaking: false,
            is_paused: false,
            progress: 100.0,
            current_word_index: None,
        }
    );

    let before = tokio::time::Instant::now();
    controller.next_event().await;

    assert!(before.elapsed() >= Duration::from_millis(1000));
    assert_eq!(controller.state(), PlaybackState::IDLE);
}

#[tokio::test(start_paused = true)]
async fn reset_is_not_due_before_the_delay() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    engine.finish_last();
    controller.process_pending();

    tokio::time::advance(Duration::from_millis(999)).await;
    assert_eq!(controller.process_pending(), 0);
    assert_progress(controller.state(), 100.0);

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(controller.process_pending(), 1);
    assert_progress(controller.state(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn restart_supersedes_pending_reset() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    engine.finish_last();
    controller.process_pending();

    controller.toggle(true);
    engine.last_events().boundary(6);
    controller.process_pending();

    tokio::time::advance(Duration::from_secs(2)).await;
    controller.process_pending();

    let state = controller.state();
    assert!(state.is_speaking);
    assert_progress(state, 54.5);
    assert_eq!(state.current_word_index, Some(1));
}

// ── Stop ───────────────────────────────────────────────────────────

#[test]
fn stop_preserves_progress_and_word() {
    let (mut controller, engine) = speaking_at_second_word();
    let cancels_before = engine.cancel_count();

    controller.toggle(false);

    assert_eq!(engine.cancel_count(), cancels_before + 1);
    let state = controller.state();
    assert!(!state.is_speaking);
    assert!(!state.is_paused);
    assert_progress(state, 54.5);
    assert_eq!(state.current_word_index, Some(1));
}

#[test]
fn stop_while_paused_clears_pause_flag() {
    let (mut controller, _engine) = speaking_at_second_word();
    controller.pause();
    controller.toggle(false);

    let state = controller.state();
    assert!(!state.is_speaking);
    assert!(!state.is_paused);
}

// ── Pause and resume ───────────────────────────────────────────────

#[test]
fn pause_then_restart_resumes_in_place() {
    let (mut controller, engine) = speaking_at_second_word();

    controller.pause();
    assert!(controller.state().is_paused);
    assert_eq!(controller.state().phase(), PlaybackPhase::Paused);

    controller.toggle(true);

    assert_eq!(engine.requests().len(), 1, "no new request while paused");
    assert_eq!(engine.resume_count(), 1);
    let state = controller.state();
    assert!(state.is_speaking);
    assert!(!state.is_paused);
    assert_progress(state, 54.5);
    assert_eq!(state.current_word_index, Some(1));
}

#[test]
fn pause_is_idempotent() {
    let (mut controller, engine) = speaking_at_second_word();
    controller.pause();
    controller.pause();
    assert_eq!(engine.pause_count(), 1);
    assert!(controller.state().is_paused);
}

#[test]
fn pause_while_idle_does_nothing() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    let mut rx = controller.subscribe();

    controller.pause();
    controller.resume();

    assert_eq!(engine.pause_count(), 0);
    assert_eq!(engine.resume_count(), 0);
    assert!(!rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), PlaybackState::IDLE);
}

#[test]
fn resume_while_not_paused_does_nothing() {
    let (mut controller, engine) = speaking_at_second_word();
    controller.resume();
    assert_eq!(engine.resume_count(), 0);
}

#[test]
fn toggle_pause_alternates() {
    let (mut controller, engine) = speaking_at_second_word();
    controller.toggle_pause();
    assert!(controller.state().is_paused);
    controller.toggle_pause();
    assert!(!controller.state().is_paused);
    assert_eq!((engine.pause_count(), engine.resume_count()), (1, 1));
}

// ── Stale events and errors ────────────────────────────────────────

#[test]
fn boundary_from_superseded_utterance_is_dropped() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    let first = engine.events(0);
    controller.toggle(true);

    first.boundary(6);
    controller.process_pending();

    let state = controller.state();
    assert_progress(state, 0.0);
    assert_eq!(state.current_word_index, Some(0));
}

#[test]
fn end_from_stopped_utterance_is_dropped() {
    let (mut controller, engine) = speaking_at_second_word();
    let events = engine.last_events();
    controller.toggle(false);

    events.ended();
    controller.process_pending();

    let state = controller.state();
    assert_progress(state, 54.5);
    assert!(!state.is_speaking);
}

#[test]
fn error_goes_straight_to_idle() {
    let (mut controller, engine) = speaking_at_second_word();
    engine.last_events().failed("synthesis-failed");
    controller.process_pending();

    assert_eq!(controller.state(), PlaybackState::IDLE);
}

#[tokio::test(start_paused = true)]
async fn error_after_completion_cancels_reset() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    let events = engine.last_events();
    engine.finish_last();
    events.failed("late");
    controller.process_pending();

    assert_eq!(controller.state(), PlaybackState::IDLE);
    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(controller.process_pending(), 0);
}

// ── Parameters ─────────────────────────────────────────────────────

#[test]
fn update_parameter_restarts_with_new_rate() {
    let (mut controller, engine, store) = controller_with_text("Hello world");
    controller.toggle(true);

    controller.update_parameter(ParamKey::Rate, "1.5");

    assert_eq!(store.get("rate").as_deref(), Some("1.5"));
    let requests = engine.requests();
    assert_eq!(requests.len(), 2);
    assert!((requests[1].rate - 1.5).abs() < f32::EPSILON);
    assert_progress(controller.state(), 0.0);
}

#[test]
fn update_parameter_while_paused_resumes() {
    let (mut controller, engine) = speaking_at_second_word();
    controller.pause();

    controller.update_parameter(ParamKey::Pitch, "0.8");

    assert_eq!(engine.requests().len(), 1);
    assert!(!controller.state().is_paused);
}

#[test]
fn non_numeric_rate_falls_back_to_default() {
    let (mut controller, engine, store) = controller_with_text("Hello world");
    store.set("rate", "fast");
    store.set("pitch", "");

    controller.toggle(true);

    let request = &engine.requests()[0];
    assert!((request.rate - 1.0).abs() < f32::EPSILON);
    assert!((request.pitch - 1.0).abs() < f32::EPSILON);
}

#[test]
fn voice_is_resolved_by_exact_name() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    let bob = Voice::new("Bob", "engine:bob").with_lang("en-GB");
    controller.set_voices(vec![Voice::new("Alice", "engine:alice"), bob.clone()]);

    controller.update_voice("Bob");
    controller.update_voice("bob");

    let requests = engine.requests();
    assert_eq!(requests[0].voice, Some(bob));
    assert_eq!(requests[1].voice, None);
}

#[test]
fn voices_discovered_later_apply_to_next_request() {
    let (mut controller, engine, store) = controller_with_text("Hello world");
    store.set("voice", "Alice");
    controller.toggle(true);
    controller.set_voices(vec![Voice::new("Alice", "engine:alice")]);
    controller.toggle(true);

    let requests = engine.requests();
    assert_eq!(requests[0].voice, None);
    assert_eq!(requests[1].voice.as_ref().map(|v| v.handle.as_str()), Some("engine:alice"));
}

// ── Observation ────────────────────────────────────────────────────

#[test]
fn late_subscriber_sees_current_state() {
    let (mut controller, _engine) = speaking_at_second_word();
    controller.pause();

    let rx = controller.subscribe();
    let state = *rx.borrow();
    assert!(state.is_paused);
    assert_eq!(state.current_word_index, Some(1));
}

#[test]
fn dropping_a_live_controller_cancels_the_engine() {
    let (mut controller, engine, _store) = controller_with_text("Hello world");
    controller.toggle(true);
    let before = engine.cancel_count();

    drop(controller);

    assert_eq!(engine.cancel_count(), before + 1);
}

// ── Engine contract (mockall) ──────────────────────────────────────

mock! {
    Engine {}

    impl recite_core::SpeechEngine for Engine {
        fn speak(&self, utterance: Utterance);
        fn cancel(&self);
        fn pause(&self);
        fn resume(&self);
        fn is_speaking(&self) -> bool;
        fn is_paused(&self) -> bool;
    }
}

#[test]
fn restart_cancels_then_speaks_with_store_values() {
    let mut engine = MockEngine::new();
    // Once for the restart, once when the controller drops with a live utterance.
    engine.expect_cancel().times(2).return_const(());
    engine
        .expect_speak()
        .withf(|u: &Utterance| {
            u.request.text == "Hello world" && (u.request.rate - 2.0).abs() < f32::EPSILON
        })
        .times(1)
        .return_const(());
    engine.expect_pause().never();
    engine.expect_resume().never();

    let store = std::sync::Arc::new(recite_core::MemoryParameterStore::with_params([
        (ParamKey::Text, "Hello world"),
        (ParamKey::Rate, "2"),
    ]));
    let mut controller = PlaybackController::new(
        store,
        std::sync::Arc::new(engine),
        recite_voice::ControllerConfig::default(),
    );

    controller.toggle(true);
    assert!(controller.state().is_speaking);
}

#[test]
fn pause_consults_engine_flags() {
    let mut engine = MockEngine::new();
    engine.expect_is_speaking().return_const(true);
    engine.expect_is_paused().return_const(true);
    engine.expect_pause().never();
    engine.expect_speak().never();

    let store = std::sync::Arc::new(recite_core::MemoryParameterStore::new());
    let mut controller = PlaybackController::new(
        store,
        std::sync::Arc::new(engine),
        recite_voice::ControllerConfig::default(),
    );

    controller.pause();
    assert!(!controller.state().is_paused);
}
