use std::time::Duration;

use crate::SubmissionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestGeneration {
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
        error_message: String,
        prompt: String,
    },
}
