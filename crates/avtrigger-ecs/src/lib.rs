//! avtrigger-ecs — orchestration collaborators for the digitized AV trigger.
//!
//! The dispatcher only ever talks to the cluster through two traits:
//!
//! - [`TaskLauncher`]: start one instance of a task definition
//! - [`ServiceScaler`]: read and set a standing service's desired count
//!
//! Two implementations are provided:
//!
//! ```text
//! EcsOrchestrator   aws-sdk-ecs client (RunTask / DescribeServices / UpdateService)
//! InMemoryCluster   services and launches held in memory, for tests and local runs
//! ```
//!
//! Collaborator failures are returned as [`OrchestrationError`] and are
//! never retried here.
//!
//! [`OrchestrationError`]: avtrigger_core::OrchestrationError

pub mod ecs;
pub mod memory;
pub mod traits;

pub use ecs::EcsOrchestrator;
pub use memory::{InMemoryCluster, RecordedLaunch};
pub use traits::{OrchestrationFuture, ServiceScaler, TaskLauncher};
