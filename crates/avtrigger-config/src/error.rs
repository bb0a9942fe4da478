//! Configuration error types.

use thiserror::Error;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter store error: {0}")]
    Store(String),

    #[error("invalid parameter path: {0}")]
    InvalidPath(String),
}
