//! Error types for the digitized AV trigger.

use thiserror::Error;

/// Result type alias for dispatch operations.
pub type TriggerResult<T> = Result<T, TriggerError>;

/// Result type alias for orchestration collaborator calls.
pub type OrchestrationResult<T> = Result<T, OrchestrationError>;

/// Errors that terminate a single invocation.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("unsure how to parse message: {0}")]
    MalformedEvent(String),

    #[error("no format mapped for bucket: {0}")]
    UnknownBucket(String),

    #[error("missing message attribute: {0}")]
    MissingAttribute(String),

    #[error("missing configuration key: {0}")]
    MissingConfig(String),

    #[error("orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures reported by the task launcher or service scaler.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("run task failed: {0}")]
    RunTask(String),

    #[error("describe services failed: {0}")]
    DescribeServices(String),

    #[error("update service failed: {0}")]
    UpdateService(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
