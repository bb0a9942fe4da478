//! Orchestration requests produced by the dispatcher.

use serde::{Deserialize, Serialize};

use crate::format::Medium;

/// Task definition run for every newly uploaded package.
pub const VALIDATION_TASK_DEFINITION: &str = "digitized_av_validation";

/// Task definition run once QC has approved a package.
pub const PACKAGING_TASK_DEFINITION: &str = "digitized_av_packaging";

/// Originator tag attached to every task the trigger launches.
pub const STARTED_BY: &str = "lambda/digitized_av_trigger";

/// A single container environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Launch one instance of a task definition with environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLaunchRequest {
    pub task_definition: String,
    /// Passed to the container in this order.
    pub environment: Vec<EnvVar>,
}

impl TaskLaunchRequest {
    /// Validation run for an object that just landed in an upload bucket.
    pub fn validation(medium: Medium, bucket: &str, object_key: &str) -> Self {
        Self {
            task_definition: VALIDATION_TASK_DEFINITION.to_string(),
            environment: vec![
                EnvVar::new("FORMAT", medium.as_str()),
                EnvVar::new("AWS_SOURCE_BUCKET", bucket),
                EnvVar::new("SOURCE_FILENAME", object_key),
            ],
        }
    }

    /// Packaging run for a package QC approved.
    pub fn packaging(format: &str, refid: &str, rights_ids: &str) -> Self {
        Self {
            task_definition: PACKAGING_TASK_DEFINITION.to_string(),
            environment: vec![
                EnvVar::new("FORMAT", format),
                EnvVar::new("REFID", refid),
                EnvVar::new("RIGHTS_IDS", rights_ids),
            ],
        }
    }

    pub fn env(&self, name: &str) -> Option<&str> {
        self.environment
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }
}

/// Set the desired replica count of a standing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceScaleRequest {
    pub service_name: String,
    pub desired_count: u32,
}

impl ServiceScaleRequest {
    pub fn up(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            desired_count: 1,
        }
    }

    pub fn down(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            desired_count: 0,
        }
    }
}
