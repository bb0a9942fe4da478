//! In-memory cluster.
//!
//! Keeps services, registered task definitions, and every call it receives,
//! so tests can assert both the responses and the exact collaborator traffic.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use avtrigger_core::{
    ContainerOverride, OrchestrationError, RunTaskResponse, STARTED_BY, ServiceDescriptor,
    ServiceScaleRequest, TaskDescriptor, TaskLaunchRequest, TaskOverrides, UpdateServiceResponse,
};

use crate::traits::{OrchestrationFuture, ServiceScaler, TaskLauncher};

const REGION: &str = "us-east-1";
const ACCOUNT_ID: &str = "123456789012";

/// A launch the in-memory cluster accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLaunch {
    pub cluster: String,
    pub subnet: String,
    pub request: TaskLaunchRequest,
}

#[derive(Debug, Default)]
struct ClusterState {
    services: HashMap<String, ServiceDescriptor>,
    task_definitions: HashSet<String>,
    launches: Vec<RecordedLaunch>,
    scale_calls: Vec<ServiceScaleRequest>,
    describe_calls: usize,
}

/// Single-cluster stand-in for the orchestration platform.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct InMemoryCluster {
    name: String,
    failing: bool,
    state: Arc<Mutex<ClusterState>>,
}

impl InMemoryCluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failing: false,
            state: Arc::new(Mutex::new(ClusterState::default())),
        }
    }

    /// A cluster whose every call fails.
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            failing: true,
            ..Self::new(name)
        }
    }

    pub async fn register_task_definition(&self, family: &str) {
        self.state
            .lock()
            .await
            .task_definitions
            .insert(family.to_string());
    }

    pub async fn create_service(&self, service: &str, desired_count: u32) {
        let descriptor = ServiceDescriptor {
            service_name: service.to_string(),
            service_arn: Some(format!(
                "arn:aws:ecs:{REGION}:{ACCOUNT_ID}:service/{}/{service}",
                self.name
            )),
            cluster_arn: Some(self.cluster_arn()),
            status: Some("ACTIVE".to_string()),
            desired_count,
            running_count: 0,
            pending_count: 0,
        };
        self.state
            .lock()
            .await
            .services
            .insert(service.to_string(), descriptor);
    }

    /// Current desired count of `service`, if it exists.
    pub async fn desired_count(&self, service: &str) -> Option<u32> {
        self.state
            .lock()
            .await
            .services
            .get(service)
            .map(|s| s.desired_count)
    }

    pub async fn launches(&self) -> Vec<RecordedLaunch> {
        self.state.lock().await.launches.clone()
    }

    pub async fn scale_calls(&self) -> Vec<ServiceScaleRequest> {
        self.state.lock().await.scale_calls.clone()
    }

    pub async fn describe_calls(&self) -> usize {
        self.state.lock().await.describe_calls
    }

    /// Total number of collaborator calls received.
    pub async fn call_count(&self) -> usize {
        let state = self.state.lock().await;
        state.launches.len() + state.scale_calls.len() + state.describe_calls
    }

    fn cluster_arn(&self) -> String {
        format!("arn:aws:ecs:{REGION}:{ACCOUNT_ID}:cluster/{}", self.name)
    }

    fn check_cluster(&self, cluster: &str) -> Result<(), String> {
        if self.failing {
            return Err("cluster unavailable".to_string());
        }
        if cluster != self.name {
            return Err(format!("cluster not found: {cluster}"));
        }
        Ok(())
    }
}

impl TaskLauncher for InMemoryCluster {
    fn launch_task<'a>(
        &'a self,
        cluster: &'a str,
        subnet: &'a str,
        request: &'a TaskLaunchRequest,
    ) -> OrchestrationFuture<'a, RunTaskResponse> {
        Box::pin(async move {
            self.check_cluster(cluster)
                .map_err(OrchestrationError::RunTask)?;

            let mut state = self.state.lock().await;
            if !state.task_definitions.contains(&request.task_definition) {
                return Err(OrchestrationError::RunTask(format!(
                    "task definition not found: {}",
                    request.task_definition
                )));
            }

            state.launches.push(RecordedLaunch {
                cluster: cluster.to_string(),
                subnet: subnet.to_string(),
                request: request.clone(),
            });
            let task_id = state.launches.len();

            Ok(RunTaskResponse {
                tasks: vec![TaskDescriptor {
                    task_arn: Some(format!(
                        "arn:aws:ecs:{REGION}:{ACCOUNT_ID}:task/{}/{task_id:032x}",
                        self.name
                    )),
                    task_definition_arn: Some(format!(
                        "arn:aws:ecs:{REGION}:{ACCOUNT_ID}:task-definition/{}:1",
                        request.task_definition
                    )),
                    cluster_arn: Some(self.cluster_arn()),
                    started_by: Some(STARTED_BY.to_string()),
                    last_status: Some("RUNNING".to_string()),
                    overrides: TaskOverrides {
                        container_overrides: vec![ContainerOverride {
                            name: request.task_definition.clone(),
                            environment: request.environment.clone(),
                        }],
                    },
                }],
                failures: Vec::new(),
            })
        })
    }
}

impl ServiceScaler for InMemoryCluster {
    fn describe_service<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
    ) -> OrchestrationFuture<'a, Option<ServiceDescriptor>> {
        Box::pin(async move {
            self.check_cluster(cluster)
                .map_err(OrchestrationError::DescribeServices)?;

            let mut state = self.state.lock().await;
            state.describe_calls += 1;
            Ok(state.services.get(service).cloned())
        })
    }

    fn set_desired_count<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
        count: u32,
    ) -> OrchestrationFuture<'a, UpdateServiceResponse> {
        Box::pin(async move {
            self.check_cluster(cluster)
                .map_err(OrchestrationError::UpdateService)?;

            let mut state = self.state.lock().await;
            state.scale_calls.push(ServiceScaleRequest {
                service_name: service.to_string(),
                desired_count: count,
            });

            let descriptor = state.services.get_mut(service).ok_or_else(|| {
                OrchestrationError::UpdateService(format!("service not found: {service}"))
            })?;
            descriptor.desired_count = count;

            Ok(UpdateServiceResponse {
                service: descriptor.clone(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avtrigger_core::Medium;

    #[tokio::test]
    async fn launch_requires_registered_definition() {
        let cluster = InMemoryCluster::new("default");
        let req = TaskLaunchRequest::validation(Medium::Audio, "rac-dev-av-upload-audio", "a.tar.gz");

        let err = cluster.launch_task("default", "subnet", &req).await.unwrap_err();
        assert!(matches!(err, OrchestrationError::RunTask(_)));

        cluster.register_task_definition("digitized_av_validation").await;
        let resp = cluster.launch_task("default", "subnet", &req).await.unwrap();

        assert_eq!(resp.tasks.len(), 1);
        assert_eq!(resp.tasks[0].started_by.as_deref(), Some(STARTED_BY));
        assert_eq!(
            resp.tasks[0].task_definition_arn.as_deref(),
            Some("arn:aws:ecs:us-east-1:123456789012:task-definition/digitized_av_validation:1")
        );
        assert_eq!(cluster.launches().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_cluster_is_rejected() {
        let cluster = InMemoryCluster::new("default");
        cluster.create_service("digitized_av_qc", 0).await;

        let err = cluster
            .describe_service("other", "digitized_av_qc")
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::DescribeServices(_)));
    }

    #[tokio::test]
    async fn set_desired_count_updates_service() {
        let cluster = InMemoryCluster::new("default");
        cluster.create_service("digitized_av_qc", 0).await;

        let resp = cluster
            .set_desired_count("default", "digitized_av_qc", 1)
            .await
            .unwrap();

        assert_eq!(resp.service.desired_count, 1);
        assert_eq!(cluster.desired_count("digitized_av_qc").await, Some(1));
        assert_eq!(cluster.scale_calls().await, vec![ServiceScaleRequest::up("digitized_av_qc")]);
    }

    #[tokio::test]
    async fn describe_missing_service_is_none() {
        let cluster = InMemoryCluster::new("default");
        let found = cluster.describe_service("default", "nope").await.unwrap();
        assert!(found.is_none());
        assert_eq!(cluster.describe_calls().await, 1);
    }

    #[tokio::test]
    async fn failing_cluster_fails_every_call() {
        let cluster = InMemoryCluster::failing("default");
        cluster.create_service("digitized_av_qc", 1).await;

        assert!(cluster.describe_service("default", "digitized_av_qc").await.is_err());
        assert!(cluster.set_desired_count("default", "digitized_av_qc", 0).await.is_err());
        assert_eq!(cluster.desired_count("digitized_av_qc").await, Some(1));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let cluster = InMemoryCluster::new("default");
        let other = cluster.clone();
        other.create_service("digitized_av_qc", 0).await;
        assert_eq!(cluster.desired_count("digitized_av_qc").await, Some(0));
    }
}
