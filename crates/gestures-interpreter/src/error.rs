//! Pipeline errors

use thiserror::Error;

/// Errors from driving a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Input arrived before [`Pipeline::initialize`](crate::Pipeline::initialize)
    #[error("Pipeline used before initialize: {0}")]
    NotInitialized(&'static str),
}

/// Result type for pipeline operations
pub type PipelineResult<T = ()> = Result<T, PipelineError>;
