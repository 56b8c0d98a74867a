use std::sync::mpsc;
use std::thread;

use preview_core::{Effect, FixOutcome, GenerationOutcome, Msg};
use preview_engine::{
    ClientError, ClientSettings, EngineError, EngineEvent, EngineEvents, EngineHandle,
    ErrorReport, FailureKind, FixResult, GenerationResult,
};
use preview_logging::{preview_debug, preview_info, preview_warn};

use super::app::AppEvent;

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: ClientSettings,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(settings)?;
        spawn_event_loop(events, event_tx)?;
        Ok(Self { engine })
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestGeneration {
                    submission_id,
                    prompt,
                } => {
                    preview_info!(
                        "RequestGeneration submission_id={} prompt_len={}",
                        submission_id,
                        prompt.len()
                    );
                    self.engine.generate(submission_id, prompt);
                }
                Effect::StartProgress {
                    submission_id,
                    interval,
                    steps,
                } => {
                    preview_debug!(
                        "StartProgress submission_id={} interval={:?} steps={}",
                        submission_id,
                        interval,
                        steps
                    );
                    self.engine.start_progress(submission_id, interval, steps);
                }
                Effect::CancelProgress { submission_id } => {
                    self.engine.cancel_progress(submission_id);
                }
                Effect::LoadFrame { submission_id, url } => {
                    preview_info!("LoadFrame submission_id={} url={}", submission_id, url);
                    self.engine.load_frame(submission_id, url);
                }
                Effect::ReportError {
                    submission_id,
                    error_message,
                    prompt,
                } => {
                    preview_info!(
                        "ReportError submission_id={} error_len={}",
                        submission_id,
                        error_message.len()
                    );
                    self.engine.report_error(
                        submission_id,
                        ErrorReport {
                            error_message,
                            prompt,
                        },
                    );
                }
            }
        }
    }
}

fn spawn_event_loop(
    events: EngineEvents,
    event_tx: mpsc::Sender<AppEvent>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("preview-events".to_string())
        .spawn(move || {
            while let Some(event) = events.recv() {
                if let Some(msg) = map_event(event) {
                    if event_tx.send(AppEvent::Core(msg)).is_err() {
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

/// Translates an engine completion into a controller message.
///
/// Failed frame loads and failed error reports are logged and dropped.
pub(crate) fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ProgressTick { submission_id } => Some(Msg::ProgressTick { submission_id }),
        EngineEvent::GenerationCompleted {
            submission_id,
            result,
        } => {
            if let Err(err) = &result {
                preview_warn!("Generation {} failed: {}", submission_id, err);
            }
            Some(Msg::GenerationCompleted {
                submission_id,
                outcome: map_generation(result),
            })
        }
        EngineEvent::FrameLoaded {
            submission_id,
            result,
        } => match result {
            Ok(()) => Some(Msg::FrameLoaded { submission_id }),
            Err(err) => {
                preview_warn!("Preview {} did not load: {}", submission_id, err);
                None
            }
        },
        EngineEvent::FixCompleted {
            submission_id,
            result,
        } => match result {
            Ok(fix) => Some(Msg::FixReceived {
                submission_id,
                outcome: map_fix(fix),
            }),
            Err(err) => {
                preview_warn!("Error report {} failed: {}", submission_id, err);
                None
            }
        },
    }
}

fn map_generation(result: Result<GenerationResult, ClientError>) -> GenerationOutcome {
    match result {
        Ok(GenerationResult::Error(error)) => GenerationOutcome::ServerError(error),
        Ok(GenerationResult::Preview { preview_url }) => GenerationOutcome::Preview(preview_url),
        Ok(GenerationResult::Unexpected) => GenerationOutcome::Unexpected,
        Err(ClientError {
            kind: FailureKind::HttpStatus(code),
            ..
        }) => GenerationOutcome::HttpStatus(code),
        Err(err) => GenerationOutcome::Failed(err.message),
    }
}

fn map_fix(fix: FixResult) -> FixOutcome {
    match fix {
        FixResult::FixedCode(code) => FixOutcome::FixedCode(code),
        FixResult::Error(error) => FixOutcome::Error(error),
        FixResult::Empty => FixOutcome::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_error(kind: FailureKind, message: &str) -> ClientError {
        ClientError {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn status_failures_keep_their_code() {
        let msg = map_event(EngineEvent::GenerationCompleted {
            submission_id: 2,
            result: Err(client_error(FailureKind::HttpStatus(503), "503 Service Unavailable")),
        });
        assert_eq!(
            msg,
            Some(Msg::GenerationCompleted {
                submission_id: 2,
                outcome: GenerationOutcome::HttpStatus(503),
            })
        );
    }

    #[test]
    fn other_failures_carry_their_message() {
        let msg = map_event(EngineEvent::GenerationCompleted {
            submission_id: 2,
            result: Err(client_error(FailureKind::Decode, "expected value at line 1")),
        });
        assert_eq!(
            msg,
            Some(Msg::GenerationCompleted {
                submission_id: 2,
                outcome: GenerationOutcome::Failed("expected value at line 1".to_string()),
            })
        );
    }

    #[test]
    fn failed_report_is_not_surfaced() {
        let msg = map_event(EngineEvent::FixCompleted {
            submission_id: 1,
            result: Err(client_error(FailureKind::Network, "connection refused")),
        });
        assert_eq!(msg, None);
    }

    #[test]
    fn fix_results_map_one_to_one() {
        let msg = map_event(EngineEvent::FixCompleted {
            submission_id: 1,
            result: Ok(FixResult::Empty),
        });
        assert_eq!(
            msg,
            Some(Msg::FixReceived {
                submission_id: 1,
                outcome: FixOutcome::Empty,
            })
        );
    }
}
