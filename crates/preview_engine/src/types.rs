use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub type SubmissionId = u64;

/// Parsed body of a `/generate` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Error(String),
    Preview { preview_url: String },
    /// Valid JSON carrying neither `error` nor `preview_url`.
    Unexpected,
}

/// Body sent to `/report-error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
    pub prompt: String,
}

/// Parsed body of a `/report-error` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixResult {
    FixedCode(String),
    Error(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ProgressTick {
        submission_id: SubmissionId,
    },
    GenerationCompleted {
        submission_id: SubmissionId,
        result: Result<GenerationResult, ClientError>,
    },
    FrameLoaded {
        submission_id: SubmissionId,
        result: Result<(), ClientError>,
    },
    FixCompleted {
        submission_id: SubmissionId,
        result: Result<FixResult, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("invalid client settings: {0}")]
    Client(#[from] ClientError),
}
