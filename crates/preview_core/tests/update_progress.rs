use std::sync::Once;
use std::time::Duration;

use preview_core::{update, AppState, Effect, GenerationOutcome, Msg, OutputBlock, ProgressScript};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(preview_logging::initialize_for_tests);
}

fn short_script() -> ProgressScript {
    ProgressScript::new(
        vec!["one".to_string(), "two".to_string(), "three".to_string()],
        Duration::from_millis(5),
    )
}

fn submit(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::Submitted)
}

fn tick(state: AppState, submission_id: u64) -> (AppState, Vec<Effect>) {
    update(state, Msg::ProgressTick { submission_id })
}

#[test]
fn ticks_replace_output_with_next_step() {
    init_logging();
    let (state, effects) = submit(AppState::new().with_script(short_script()), "counter");
    assert!(effects.contains(&Effect::StartProgress {
        submission_id: 1,
        interval: Duration::from_millis(5),
        steps: 3,
    }));

    let (state, effects) = tick(state, 1);
    assert!(effects.is_empty());
    assert_eq!(state.view().output, vec![OutputBlock::Status("one".to_string())]);

    let (state, _) = tick(state, 1);
    assert_eq!(state.view().output, vec![OutputBlock::Status("two".to_string())]);
    assert!(state.view().loading);
}

#[test]
fn exhausted_script_cancels_and_stops_rendering() {
    init_logging();
    let (state, _) = submit(AppState::new().with_script(short_script()), "counter");
    let (state, _) = tick(state, 1);
    let (state, _) = tick(state, 1);
    let (state, effects) = tick(state, 1);

    assert_eq!(effects, vec![Effect::CancelProgress { submission_id: 1 }]);
    assert_eq!(
        state.view().output,
        vec![OutputBlock::Status("three".to_string())]
    );

    let before = state.view();
    let (state, effects) = tick(state, 1);
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
    assert!(state.view().loading);

    // Completion after exhaustion has no ticker left to cancel.
    let (state, effects) = update(
        state,
        Msg::GenerationCompleted {
            submission_id: 1,
            outcome: GenerationOutcome::ServerError("late".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.view().loading);
}

#[test]
fn tick_after_response_is_never_rendered() {
    init_logging();
    let (state, _) = submit(AppState::new().with_script(short_script()), "counter");
    let (state, _) = update(
        state,
        Msg::GenerationCompleted {
            submission_id: 1,
            outcome: GenerationOutcome::Preview("https://host/abc".to_string()),
        },
    );
    let (state, effects) = tick(state, 1);

    assert!(effects.is_empty());
    assert!(!state
        .view()
        .output
        .iter()
        .any(|block| matches!(block, OutputBlock::Status(_))));
}

#[test]
fn tick_for_superseded_submission_is_ignored() {
    init_logging();
    let (state, _) = submit(AppState::new().with_script(short_script()), "first");
    let (state, _) = submit(state, "second");
    let (state, effects) = tick(state, 1);

    assert!(effects.is_empty());
    assert!(state.view().output.is_empty());

    let (state, _) = tick(state, 2);
    assert_eq!(state.view().output, vec![OutputBlock::Status("one".to_string())]);
}

#[test]
fn empty_script_never_starts_progress() {
    init_logging();
    let state =
        AppState::new().with_script(ProgressScript::new(Vec::new(), Duration::from_millis(5)));
    let (_state, effects) = submit(state, "counter");

    assert_eq!(
        effects,
        vec![Effect::RequestGeneration {
            submission_id: 1,
            prompt: "counter".to_string(),
        }]
    );
}
