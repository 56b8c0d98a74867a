pub const PROMPT_REQUIRED_MESSAGE: &str = "Please enter a prompt.";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server";

/// One unit of content in the output area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBlock {
    /// Local validation feedback.
    Notice(String),
    /// Simulated progress text.
    Status(String),
    Error(String),
    /// Embedded preview plus its links.
    Preview {
        frame_src: String,
        direct_link: String,
        share_link: Option<String>,
    },
    /// Replacement code returned after an error report.
    FixedCode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: crate::Phase,
    pub loading: bool,
    pub input: String,
    pub output: Vec<OutputBlock>,
    pub submission_id: Option<crate::SubmissionId>,
    pub dirty: bool,
}

