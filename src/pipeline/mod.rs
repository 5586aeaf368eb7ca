//! Natural language translation pipeline
//!
//! user text -> PipelineStage x N (oracle + extraction) -> ParameterValidator -> PipelineResult

pub mod command;
pub mod prompts;
pub mod stage;

pub use command::{CommandPipeline, PipelineResult};
pub use stage::{ErrorKind, PipelineMode, PipelineStage, StageError};
