//! Preview engine: HTTP client, progress ticker and effect execution.
mod client;
mod engine;
mod ticker;
mod types;

pub use client::{ClientSettings, GenerationApi, ReqwestGenerationApi};
pub use engine::{EngineEvents, EngineHandle};
pub use ticker::{run_progress_ticker, ChannelEventSink, EventSink};
pub use types::{
    ClientError, EngineError, EngineEvent, ErrorReport, FailureKind, FixResult, GenerationResult,
    SubmissionId,
};
