use crate::SubmissionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the prompt field.
    InputChanged(String),
    /// User submitted the current prompt.
    Submitted,
    /// Progress ticker fired for a submission.
    ProgressTick { submission_id: SubmissionId },
    /// Generation request finished, one way or another.
    GenerationCompleted {
        submission_id: SubmissionId,
        outcome: GenerationOutcome,
    },
    /// The embedded preview finished loading; its error handler is attached.
    FrameLoaded { submission_id: SubmissionId },
    /// An uncaught runtime error was observed inside the preview.
    FrameError {
        submission_id: SubmissionId,
        message: String,
        stack: Option<String>,
    },
    /// Report endpoint answered an error report.
    FixReceived {
        submission_id: SubmissionId,
        outcome: FixOutcome,
    },
}

/// Outcome of a generation request as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Server answered with a non-success HTTP status.
    HttpStatus(u16),
    /// Transport failure or malformed body.
    Failed(String),
    /// Server answered with an `error` field.
    ServerError(String),
    /// Server answered with a `preview_url`.
    Preview(String),
    /// Server answered with neither field.
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    FixedCode(String),
    Error(String),
    Empty,
}
