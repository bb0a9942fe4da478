//! Collaborator traits consumed by the dispatcher.

use std::future::Future;
use std::pin::Pin;

use avtrigger_core::{
    OrchestrationResult, RunTaskResponse, ServiceDescriptor, TaskLaunchRequest,
    UpdateServiceResponse,
};

/// Boxed future alias for orchestration calls.
pub type OrchestrationFuture<'a, T> =
    Pin<Box<dyn Future<Output = OrchestrationResult<T>> + Send + 'a>>;

/// Starts containerized tasks.
///
/// Implementations launch exactly one instance on Fargate in `subnet`,
/// without a public IP, tagged with [`avtrigger_core::STARTED_BY`], and
/// with a container override named after the task definition that carries
/// the request's environment.
pub trait TaskLauncher: Send + Sync {
    fn launch_task<'a>(
        &'a self,
        cluster: &'a str,
        subnet: &'a str,
        request: &'a TaskLaunchRequest,
    ) -> OrchestrationFuture<'a, RunTaskResponse>;
}

/// Reads and adjusts the desired count of standing services.
pub trait ServiceScaler: Send + Sync {
    /// Current state of `service`, or `None` if the cluster does not know it.
    fn describe_service<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
    ) -> OrchestrationFuture<'a, Option<ServiceDescriptor>>;

    /// Set the desired count. Setting the current value again is harmless.
    fn set_desired_count<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
        count: u32,
    ) -> OrchestrationFuture<'a, UpdateServiceResponse>;
}
