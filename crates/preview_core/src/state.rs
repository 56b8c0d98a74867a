use crate::view_model::{AppViewModel, OutputBlock};
use crate::ProgressScript;

pub type SubmissionId = u64;

/// Optional behaviours of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Step through the progress script while generation is pending.
    pub progress_simulation: bool,
    /// Load the preview frame and forward its runtime errors.
    pub error_reporting: bool,
    /// Render the derived share link next to the preview.
    pub share_link: bool,
}

impl Features {
    /// Only the request/response cycle, nothing optional.
    pub fn minimal() -> Self {
        Self {
            progress_simulation: false,
            error_reporting: false,
            share_link: false,
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self {
            progress_simulation: true,
            error_reporting: true,
            share_link: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Submission {
    pub(crate) id: SubmissionId,
    pub(crate) prompt: String,
    pub(crate) next_step: usize,
    pub(crate) progress_active: bool,
    pub(crate) frame_ready: bool,
}

impl Submission {
    fn new(id: SubmissionId, prompt: String, progress_active: bool) -> Self {
        Self {
            id,
            prompt,
            next_step: 0,
            progress_active,
            frame_ready: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    features: Features,
    script: ProgressScript,
    input: String,
    phase: Phase,
    loading: bool,
    output: Vec<OutputBlock>,
    current: Option<Submission>,
    next_submission_id: SubmissionId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(features: Features) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    pub fn with_script(mut self, script: ProgressScript) -> Self {
        self.script = script;
        self
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            loading: self.loading,
            input: self.input.clone(),
            output: self.output.clone(),
            submission_id: self.current.as_ref().map(|s| s.id),
            dirty: self.dirty,
        }
    }

    /// Returns whether the view changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn script(&self) -> &ProgressScript {
        &self.script
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    /// The prompt field is not part of the output area, so this never dirties the view.
    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
    }

    /// Starts a new submission cycle, superseding any in-flight one.
    ///
    /// Returns the new id and the id of the superseded submission if its
    /// progress ticker was still running.
    pub(crate) fn begin_submission(
        &mut self,
        prompt: String,
    ) -> (SubmissionId, Option<SubmissionId>) {
        let superseded = self
            .current
            .as_ref()
            .filter(|s| s.progress_active)
            .map(|s| s.id);

        self.next_submission_id += 1;
        let id = self.next_submission_id;
        let progress_active = self.features.progress_simulation && !self.script.is_empty();
        self.current = Some(Submission::new(id, prompt, progress_active));
        self.phase = Phase::Submitting;
        self.loading = true;
        self.output.clear();
        self.dirty = true;
        (id, superseded)
    }

    /// The in-flight or last submission, if `id` is still the latest one.
    pub(crate) fn current_mut(&mut self, id: SubmissionId) -> Option<&mut Submission> {
        self.current.as_mut().filter(|s| s.id == id)
    }

    pub(crate) fn current(&self, id: SubmissionId) -> Option<&Submission> {
        self.current.as_ref().filter(|s| s.id == id)
    }

    /// Replacing the output removes any rendered frame, detaching its error handler.
    pub(crate) fn replace_output(&mut self, block: OutputBlock) {
        if let Some(submission) = self.current.as_mut() {
            submission.frame_ready = false;
        }
        self.output.clear();
        self.output.push(block);
        self.dirty = true;
    }

    pub(crate) fn has_preview(&self) -> bool {
        self.output
            .iter()
            .any(|block| matches!(block, OutputBlock::Preview { .. }))
    }

    pub(crate) fn append_output(&mut self, block: OutputBlock) {
        self.output.push(block);
        self.dirty = true;
    }

    /// Ends the submitting phase; the loading indicator is hidden last.
    pub(crate) fn finish_submission(&mut self, phase: Phase) {
        self.phase = phase;
        self.loading = false;
        self.dirty = true;
    }
}
