//! ECS-backed orchestrator.
//!
//! Translates launch and scale requests into `RunTask`, `DescribeServices`
//! and `UpdateService` calls, and converts the SDK output into the
//! serializable response types from `avtrigger-core`.

use aws_sdk_ecs::Client;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride as SdkContainerOverride, Failure,
    KeyValuePair, LaunchType, NetworkConfiguration, Service, Task, TaskOverride,
};
use tracing::{debug, info};

use avtrigger_core::{
    ContainerOverride, EnvVar, LaunchFailure, OrchestrationError, RunTaskResponse,
    STARTED_BY, ServiceDescriptor, TaskDescriptor, TaskLaunchRequest, TaskOverrides,
    UpdateServiceResponse,
};

use crate::traits::{OrchestrationFuture, ServiceScaler, TaskLauncher};

/// Orchestrator talking to Amazon ECS.
#[derive(Debug, Clone)]
pub struct EcsOrchestrator {
    client: Client,
}

impl EcsOrchestrator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl TaskLauncher for EcsOrchestrator {
    fn launch_task<'a>(
        &'a self,
        cluster: &'a str,
        subnet: &'a str,
        request: &'a TaskLaunchRequest,
    ) -> OrchestrationFuture<'a, RunTaskResponse> {
        Box::pin(async move {
            let vpc = AwsVpcConfiguration::builder()
                .subnets(subnet)
                .set_security_groups(Some(Vec::new()))
                .assign_public_ip(AssignPublicIp::Disabled)
                .build()
                .map_err(|e| OrchestrationError::InvalidRequest(e.to_string()))?;

            let environment = request
                .environment
                .iter()
                .map(|e| KeyValuePair::builder().name(&e.name).value(&e.value).build())
                .collect();

            let overrides = TaskOverride::builder()
                .container_overrides(
                    SdkContainerOverride::builder()
                        .name(&request.task_definition)
                        .set_environment(Some(environment))
                        .build(),
                )
                .build();

            debug!(
                cluster,
                task_definition = %request.task_definition,
                "running task"
            );

            let output = self
                .client
                .run_task()
                .cluster(cluster)
                .launch_type(LaunchType::Fargate)
                .network_configuration(
                    NetworkConfiguration::builder()
                        .awsvpc_configuration(vpc)
                        .build(),
                )
                .task_definition(&request.task_definition)
                .count(1)
                .started_by(STARTED_BY)
                .overrides(overrides)
                .send()
                .await
                .map_err(|e| OrchestrationError::RunTask(DisplayErrorContext(&e).to_string()))?;

            let response = RunTaskResponse {
                tasks: output.tasks().iter().map(task_descriptor).collect(),
                failures: output.failures().iter().map(launch_failure).collect(),
            };

            info!(
                cluster,
                task_definition = %request.task_definition,
                tasks = response.tasks.len(),
                failures = response.failures.len(),
                "task launch requested"
            );

            Ok(response)
        })
    }
}

impl ServiceScaler for EcsOrchestrator {
    fn describe_service<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
    ) -> OrchestrationFuture<'a, Option<ServiceDescriptor>> {
        Box::pin(async move {
            let output = self
                .client
                .describe_services()
                .cluster(cluster)
                .services(service)
                .send()
                .await
                .map_err(|e| {
                    OrchestrationError::DescribeServices(DisplayErrorContext(&e).to_string())
                })?;

            Ok(output.services().first().map(service_descriptor))
        })
    }

    fn set_desired_count<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
        count: u32,
    ) -> OrchestrationFuture<'a, UpdateServiceResponse> {
        Box::pin(async move {
            let desired = i32::try_from(count).map_err(|_| {
                OrchestrationError::InvalidRequest(format!("desired count out of range: {count}"))
            })?;

            let output = self
                .client
                .update_service()
                .cluster(cluster)
                .service(service)
                .desired_count(desired)
                .send()
                .await
                .map_err(|e| {
                    OrchestrationError::UpdateService(DisplayErrorContext(&e).to_string())
                })?;

            let service = output.service().map(service_descriptor).ok_or_else(|| {
                OrchestrationError::UpdateService(format!("no service returned for {service}"))
            })?;

            info!(
                cluster,
                service = %service.service_name,
                desired_count = service.desired_count,
                "service updated"
            );

            Ok(UpdateServiceResponse { service })
        })
    }
}

fn task_descriptor(task: &Task) -> TaskDescriptor {
    let container_overrides = task
        .overrides()
        .map(|o| {
            o.container_overrides()
                .iter()
                .map(|c| ContainerOverride {
                    name: c.name().unwrap_or_default().to_string(),
                    environment: c
                        .environment()
                        .iter()
                        .map(|kv| {
                            EnvVar::new(
                                kv.name().unwrap_or_default(),
                                kv.value().unwrap_or_default(),
                            )
                        })
                        .collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    TaskDescriptor {
        task_arn: task.task_arn().map(str::to_string),
        task_definition_arn: task.task_definition_arn().map(str::to_string),
        cluster_arn: task.cluster_arn().map(str::to_string),
        started_by: task.started_by().map(str::to_string),
        last_status: task.last_status().map(str::to_string),
        overrides: TaskOverrides { container_overrides },
    }
}

fn launch_failure(failure: &Failure) -> LaunchFailure {
    LaunchFailure {
        arn: failure.arn().map(str::to_string),
        reason: failure.reason().map(str::to_string),
        detail: failure.detail().map(str::to_string),
    }
}

fn service_descriptor(service: &Service) -> ServiceDescriptor {
    ServiceDescriptor {
        service_name: service.service_name().unwrap_or_default().to_string(),
        service_arn: service.service_arn().map(str::to_string),
        cluster_arn: service.cluster_arn().map(str::to_string),
        status: service.status().map(str::to_string),
        desired_count: non_negative(service.desired_count()),
        running_count: non_negative(service.running_count()),
        pending_count: non_negative(service.pending_count()),
    }
}

fn non_negative(n: i32) -> u32 {
    u32::try_from(n).unwrap_or(0)
}
