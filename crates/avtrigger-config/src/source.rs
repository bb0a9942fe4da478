//! Parameter sources.
//!
//! [`ParameterSource`] is the seam between configuration loading and the
//! store behind it. [`crate::SsmParameterStore`] talks to the real
//! parameter store; [`InMemoryParameters`] serves tests and local runs.

use std::future::Future;
use std::pin::Pin;

use crate::error::{ConfigError, ConfigResult};

/// A stored parameter: full hierarchical name and (decrypted) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Last `/` segment of the name, used as the configuration key.
    pub fn key(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Boxed future alias for parameter reads.
pub type ParameterFuture<'a> =
    Pin<Box<dyn Future<Output = ConfigResult<Vec<Parameter>>> + Send + 'a>>;

/// A hierarchical key-value store readable by path.
pub trait ParameterSource: Send + Sync {
    /// Every parameter directly beneath `path` (non-recursive), decrypted.
    fn parameters_by_path<'a>(&'a self, path: &'a str) -> ParameterFuture<'a>;
}

/// Fixed set of parameters held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryParameters {
    params: Vec<Parameter>,
    unreachable: bool,
}

impl InMemoryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every read.
    pub fn unreachable() -> Self {
        Self {
            params: Vec::new(),
            unreachable: true,
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(Parameter::new(name, value));
        self
    }
}

impl ParameterSource for InMemoryParameters {
    fn parameters_by_path<'a>(&'a self, path: &'a str) -> ParameterFuture<'a> {
        Box::pin(async move {
            if self.unreachable {
                return Err(ConfigError::Store("parameter store unreachable".to_string()));
            }
            let prefix = path.trim_end_matches('/');
            Ok(self
                .params
                .iter()
                .filter(|p| {
                    p.name
                        .strip_prefix(prefix)
                        .and_then(|rest| rest.strip_prefix('/'))
                        .is_some_and(|leaf| !leaf.is_empty() && !leaf.contains('/'))
                })
                .cloned()
                .collect())
        })
    }
}
