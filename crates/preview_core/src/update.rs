use crate::{
    derive_share_url, AppState, Effect, FixOutcome, GenerationOutcome, Msg, OutputBlock, Phase,
    SubmissionId, PROMPT_REQUIRED_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::Submitted => submit(&mut state),
        Msg::ProgressTick { submission_id } => advance_progress(&mut state, submission_id),
        Msg::GenerationCompleted {
            submission_id,
            outcome,
        } => complete_generation(&mut state, submission_id, outcome),
        Msg::FrameLoaded { submission_id } => {
            let reporting = state.features().error_reporting;
            let succeeded = state.phase() == Phase::Succeeded && state.has_preview();
            if let Some(submission) = state.current_mut(submission_id) {
                if reporting && succeeded {
                    submission.frame_ready = true;
                }
            }
            Vec::new()
        }
        Msg::FrameError {
            submission_id,
            message,
            stack,
        } => report_frame_error(&state, submission_id, message, stack),
        Msg::FixReceived {
            submission_id,
            outcome,
        } => {
            if state.current(submission_id).is_none() {
                return (state, Vec::new());
            }
            match outcome {
                FixOutcome::FixedCode(code) => state.append_output(OutputBlock::FixedCode(code)),
                FixOutcome::Error(error) => {
                    state.append_output(OutputBlock::Error(format!("Error: {error}")))
                }
                FixOutcome::Empty => {}
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let prompt = state.input().trim().to_string();
    if prompt.is_empty() {
        state.replace_output(OutputBlock::Notice(PROMPT_REQUIRED_MESSAGE.to_string()));
        return Vec::new();
    }

    let (submission_id, superseded) = state.begin_submission(prompt.clone());
    let mut effects = Vec::with_capacity(3);
    if let Some(previous) = superseded {
        effects.push(Effect::CancelProgress {
            submission_id: previous,
        });
    }
    let progress_active = state
        .current(submission_id)
        .is_some_and(|submission| submission.progress_active);
    if progress_active {
        effects.push(Effect::StartProgress {
            submission_id,
            interval: state.script().interval(),
            steps: state.script().len(),
        });
    }
    effects.push(Effect::RequestGeneration {
        submission_id,
        prompt,
    });
    effects
}

fn advance_progress(state: &mut AppState, submission_id: SubmissionId) -> Vec<Effect> {
    if state.phase() != Phase::Submitting {
        return Vec::new();
    }
    let Some(index) = state
        .current(submission_id)
        .filter(|submission| submission.progress_active)
        .map(|submission| submission.next_step)
    else {
        return Vec::new();
    };

    let step = state.script().step(index).map(ToOwned::to_owned);
    let exhausted = index + 1 >= state.script().len();
    if let Some(submission) = state.current_mut(submission_id) {
        submission.next_step = index + 1;
        if exhausted {
            submission.progress_active = false;
        }
    }
    if let Some(text) = step {
        state.replace_output(OutputBlock::Status(text));
    }

    if exhausted {
        vec![Effect::CancelProgress { submission_id }]
    } else {
        Vec::new()
    }
}

fn complete_generation(
    state: &mut AppState,
    submission_id: SubmissionId,
    outcome: GenerationOutcome,
) -> Vec<Effect> {
    if state.phase() != Phase::Submitting {
        return Vec::new();
    }
    let Some(submission) = state.current_mut(submission_id) else {
        return Vec::new();
    };

    let mut effects = Vec::new();
    if submission.progress_active {
        submission.progress_active = false;
        effects.push(Effect::CancelProgress { submission_id });
    }

    let features = state.features();
    let phase = match outcome {
        GenerationOutcome::HttpStatus(code) => {
            state.replace_output(OutputBlock::Error(format!(
                "Error: HTTP error! status: {code}"
            )));
            Phase::Failed
        }
        GenerationOutcome::Failed(message) | GenerationOutcome::ServerError(message) => {
            state.replace_output(OutputBlock::Error(format!("Error: {message}")));
            Phase::Failed
        }
        GenerationOutcome::Preview(url) => {
            let share_link = if features.share_link {
                derive_share_url(&url)
            } else {
                None
            };
            state.replace_output(OutputBlock::Preview {
                frame_src: url.clone(),
                direct_link: url.clone(),
                share_link,
            });
            if features.error_reporting {
                effects.push(Effect::LoadFrame { submission_id, url });
            }
            Phase::Succeeded
        }
        GenerationOutcome::Unexpected => {
            state.replace_output(OutputBlock::Error(UNEXPECTED_RESPONSE_MESSAGE.to_string()));
            Phase::Failed
        }
    };

    state.finish_submission(phase);
    effects
}

fn report_frame_error(
    state: &AppState,
    submission_id: SubmissionId,
    message: String,
    stack: Option<String>,
) -> Vec<Effect> {
    if !state.features().error_reporting {
        return Vec::new();
    }
    let Some(submission) = state
        .current(submission_id)
        .filter(|submission| submission.frame_ready)
    else {
        return Vec::new();
    };

    let error_message = stack
        .filter(|stack| !stack.trim().is_empty())
        .unwrap_or(message);
    vec![Effect::ReportError {
        submission_id,
        error_message,
        prompt: submission.prompt.clone(),
    }]
}
