use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use preview_logging::{preview_debug, preview_info};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, GenerationApi, ReqwestGenerationApi};
use crate::ticker::{run_progress_ticker, ChannelEventSink, EventSink};
use crate::{EngineError, EngineEvent, ErrorReport, SubmissionId};

#[derive(Debug)]
enum EngineCommand {
    Generate {
        submission_id: SubmissionId,
        prompt: String,
    },
    StartProgress {
        submission_id: SubmissionId,
        interval: Duration,
        steps: usize,
    },
    CancelProgress {
        submission_id: SubmissionId,
    },
    LoadFrame {
        submission_id: SubmissionId,
        url: String,
    },
    ReportError {
        submission_id: SubmissionId,
        report: ErrorReport,
    },
}

/// Sending half of the engine: queues work for the runtime thread.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving half of the engine: completions in arrival order.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<(Self, EngineEvents), EngineError> {
        let api = ReqwestGenerationApi::new(settings)?;
        preview_info!("Engine using base url {}", api.base_url());
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn GenerationApi>) -> Result<(Self, EngineEvents), EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("preview-engine".to_string())
            .spawn(move || run_engine(runtime, api, cmd_rx, event_tx))?;

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn generate(&self, submission_id: SubmissionId, prompt: impl Into<String>) {
        self.send(EngineCommand::Generate {
            submission_id,
            prompt: prompt.into(),
        });
    }

    pub fn start_progress(&self, submission_id: SubmissionId, interval: Duration, steps: usize) {
        self.send(EngineCommand::StartProgress {
            submission_id,
            interval,
            steps,
        });
    }

    pub fn cancel_progress(&self, submission_id: SubmissionId) {
        self.send(EngineCommand::CancelProgress { submission_id });
    }

    pub fn load_frame(&self, submission_id: SubmissionId, url: impl Into<String>) {
        self.send(EngineCommand::LoadFrame {
            submission_id,
            url: url.into(),
        });
    }

    pub fn report_error(&self, submission_id: SubmissionId, report: ErrorReport) {
        self.send(EngineCommand::ReportError {
            submission_id,
            report,
        });
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

fn run_engine(
    runtime: Runtime,
    api: Arc<dyn GenerationApi>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
    let mut tickers: HashMap<SubmissionId, CancellationToken> = HashMap::new();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::StartProgress {
                submission_id,
                interval,
                steps,
            } => {
                let token = CancellationToken::new();
                if let Some(previous) = tickers.insert(submission_id, token.clone()) {
                    previous.cancel();
                }
                let sink = sink.clone();
                runtime.spawn(async move {
                    run_progress_ticker(submission_id, interval, steps, token, sink.as_ref()).await;
                });
            }
            EngineCommand::CancelProgress { submission_id } => {
                if let Some(token) = tickers.remove(&submission_id) {
                    preview_debug!("Cancelling progress for submission {}", submission_id);
                    token.cancel();
                }
            }
            request => {
                let api = api.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_request(api.as_ref(), request, sink.as_ref()).await;
                });
            }
        }
    }

    for token in tickers.values() {
        token.cancel();
    }
    preview_debug!("Engine command channel closed; shutting down");
}

async fn handle_request(api: &dyn GenerationApi, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Generate {
            submission_id,
            prompt,
        } => {
            let result = api.generate(&prompt).await;
            sink.emit(EngineEvent::GenerationCompleted {
                submission_id,
                result,
            });
        }
        EngineCommand::LoadFrame { submission_id, url } => {
            let result = api.load_frame(&url).await;
            sink.emit(EngineEvent::FrameLoaded {
                submission_id,
                result,
            });
        }
        EngineCommand::ReportError {
            submission_id,
            report,
        } => {
            let result = api.report_error(&report).await;
            sink.emit(EngineEvent::FixCompleted {
                submission_id,
                result,
            });
        }
        EngineCommand::StartProgress { .. } | EngineCommand::CancelProgress { .. } => {}
    }
}
