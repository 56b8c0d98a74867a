//! Preview core: pure submission controller and view-model helpers.
mod effect;
mod msg;
mod progress;
mod share;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{FixOutcome, GenerationOutcome, Msg};
pub use progress::{ProgressScript, DEFAULT_PROGRESS_STEPS, DEFAULT_STEP_INTERVAL};
pub use share::derive_share_url;
pub use state::{AppState, Features, Phase, SubmissionId};
pub use update::update;
pub use view_model::{
    AppViewModel, OutputBlock, PROMPT_REQUIRED_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};
