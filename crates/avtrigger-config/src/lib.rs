//! avtrigger-config — runtime configuration for the digitized AV trigger.
//!
//! Configuration lives in a hierarchical parameter store under
//! `/{stage}/{app}`. Every parameter directly beneath that path becomes one
//! key, named by the last segment of the parameter name.
//!
//! # Failure policy
//!
//! [`TriggerConfig::load`] returns a `Result` and lets the caller decide.
//! [`TriggerConfig::load_lenient`] never fails: a store error is logged and
//! an empty configuration is returned. The dispatcher then reports the
//! specific key it needed (`MissingConfig`) at the point of use.

pub mod config;
pub mod error;
pub mod path;
pub mod source;
pub mod ssm;

pub use config::{KEY_ECS_CLUSTER, KEY_ECS_SUBNET, KEY_QC_ECS_SERVICE, TriggerConfig};
pub use error::{ConfigError, ConfigResult};
pub use path::ConfigPath;
pub use source::{InMemoryParameters, Parameter, ParameterSource};
pub use ssm::SsmParameterStore;
