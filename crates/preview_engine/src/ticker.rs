use std::sync::mpsc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, SubmissionId};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Emits up to `steps` progress ticks, one per `interval`.
///
/// Once `token` is cancelled no further tick is emitted, even if the
/// interval elapsed in the same instant.
pub async fn run_progress_ticker(
    submission_id: SubmissionId,
    interval: Duration,
    steps: usize,
    token: CancellationToken,
    sink: &dyn EventSink,
) {
    for _ in 0..steps {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
        if token.is_cancelled() {
            return;
        }
        sink.emit(EngineEvent::ProgressTick { submission_id });
    }
}
