//! Orchestration results.
//!
//! These mirror the JSON the orchestration API returns (camelCase field
//! names) so the invoker sees the same structure whether the call went to
//! the real cluster or the in-memory one.

use serde::{Deserialize, Serialize};

use crate::request::EnvVar;

/// Result of launching a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskResponse {
    pub tasks: Vec<TaskDescriptor>,
    #[serde(default)]
    pub failures: Vec<LaunchFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default)]
    pub overrides: TaskOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverrides {
    pub container_overrides: Vec<ContainerOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerOverride {
    pub name: String,
    pub environment: Vec<EnvVar>,
}

/// A launch the cluster refused (capacity, missing definition, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of changing a service's desired count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateServiceResponse {
    pub service: ServiceDescriptor,
}

/// Current shape of a standing service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub desired_count: u32,
    pub running_count: u32,
    pub pending_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_task_response_uses_api_field_names() {
        let resp = RunTaskResponse {
            tasks: vec![TaskDescriptor {
                task_arn: Some("arn:aws:ecs:us-east-1:123456789012:task/default/1".into()),
                started_by: Some("lambda/digitized_av_trigger".into()),
                overrides: TaskOverrides {
                    container_overrides: vec![ContainerOverride {
                        name: "digitized_av_validation".into(),
                        environment: vec![EnvVar::new("FORMAT", "audio")],
                    }],
                },
                ..Default::default()
            }],
            failures: Vec::new(),
        };

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["tasks"][0]["startedBy"], "lambda/digitized_av_trigger");
        assert_eq!(
            value["tasks"][0]["overrides"]["containerOverrides"][0]["environment"][0],
            serde_json::json!({ "name": "FORMAT", "value": "audio" })
        );
        assert!(value["tasks"][0].get("lastStatus").is_none());
    }

    #[test]
    fn service_response_exposes_desired_count() {
        let resp = UpdateServiceResponse {
            service: ServiceDescriptor {
                service_name: "digitized_av_qc".into(),
                desired_count: 1,
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["service"]["desiredCount"], 1);
        assert_eq!(value["service"]["serviceName"], "digitized_av_qc");
    }
}
