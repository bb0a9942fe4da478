//! Carries out a classified [`Action`] against the collaborators.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use avtrigger_config::TriggerConfig;
use avtrigger_core::{RunTaskResponse, TaskLaunchRequest, TriggerResult, UpdateServiceResponse};
use avtrigger_ecs::{ServiceScaler, TaskLauncher};

use crate::action::Action;

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    TaskLaunched(RunTaskResponse),
    ServiceUpdated(UpdateServiceResponse),
    /// Scale-up found the service already running (or absent); no write issued.
    ScaleSkipped,
    NothingToDo,
}

impl DispatchOutcome {
    /// The JSON returned to the invoker.
    ///
    /// Collaborator responses are returned as-is, a skipped scale-up is
    /// `null`, and a no-op is a message quoting the received event.
    pub fn to_reply(&self, source: &str, payload: &Value) -> serde_json::Result<Value> {
        match self {
            DispatchOutcome::TaskLaunched(resp) => serde_json::to_value(resp),
            DispatchOutcome::ServiceUpdated(resp) => serde_json::to_value(resp),
            DispatchOutcome::ScaleSkipped => Ok(Value::Null),
            DispatchOutcome::NothingToDo => Ok(Value::String(format!(
                "Nothing to do for {source} event: {payload}"
            ))),
        }
    }
}

/// Issues the single orchestration command an action calls for.
#[derive(Clone)]
pub struct Dispatcher {
    launcher: Arc<dyn TaskLauncher>,
    scaler: Arc<dyn ServiceScaler>,
}

impl Dispatcher {
    pub fn new(launcher: Arc<dyn TaskLauncher>, scaler: Arc<dyn ServiceScaler>) -> Self {
        Self { launcher, scaler }
    }

    /// Use one collaborator for both launching and scaling.
    pub fn with_cluster<C>(cluster: C) -> Self
    where
        C: TaskLauncher + ServiceScaler + 'static,
    {
        let cluster = Arc::new(cluster);
        let launcher: Arc<dyn TaskLauncher> = cluster.clone();
        Self {
            launcher,
            scaler: cluster,
        }
    }

    /// Execute `action`. Collaborator errors propagate unchanged.
    pub async fn dispatch(
        &self,
        config: &TriggerConfig,
        action: &Action,
    ) -> TriggerResult<DispatchOutcome> {
        match action {
            Action::ObjectCreated(request) => {
                info!(
                    object = request.env("SOURCE_FILENAME").unwrap_or_default(),
                    bucket = request.env("AWS_SOURCE_BUCKET").unwrap_or_default(),
                    format = request.env("FORMAT").unwrap_or_default(),
                    "running validation task"
                );
                self.launch(config, request).await
            }
            Action::QcSuccess(request) => {
                info!(
                    refid = request.env("REFID").unwrap_or_default(),
                    format = request.env("FORMAT").unwrap_or_default(),
                    "running packaging task"
                );
                self.launch(config, request).await
            }
            Action::ValidationSuccess => self.scale_up_qc(config).await,
            Action::QcComplete => self.scale_down_qc(config).await,
            Action::ObjectOtherEvent { .. } | Action::Unrecognized { .. } => {
                debug!(?action, "nothing to do");
                Ok(DispatchOutcome::NothingToDo)
            }
        }
    }

    async fn launch(
        &self,
        config: &TriggerConfig,
        request: &TaskLaunchRequest,
    ) -> TriggerResult<DispatchOutcome> {
        let cluster = config.cluster()?;
        let subnet = config.subnet()?;
        let resp = self.launcher.launch_task(cluster, subnet, request).await?;
        Ok(DispatchOutcome::TaskLaunched(resp))
    }

    // Read-then-write: two concurrent invocations may both see 0 and both
    // write 1, which leaves the same state as one write.
    async fn scale_up_qc(&self, config: &TriggerConfig) -> TriggerResult<DispatchOutcome> {
        let cluster = config.cluster()?;
        let service = config.qc_service()?;
        info!(service, "scaling up QC service");

        match self.scaler.describe_service(cluster, service).await? {
            Some(current) if current.desired_count < 1 => {
                let resp = self.scaler.set_desired_count(cluster, service, 1).await?;
                Ok(DispatchOutcome::ServiceUpdated(resp))
            }
            Some(current) => {
                debug!(
                    service,
                    desired_count = current.desired_count,
                    "QC service already scaled up"
                );
                Ok(DispatchOutcome::ScaleSkipped)
            }
            None => {
                warn!(service, cluster, "QC service not found, skipping scale-up");
                Ok(DispatchOutcome::ScaleSkipped)
            }
        }
    }

    async fn scale_down_qc(&self, config: &TriggerConfig) -> TriggerResult<DispatchOutcome> {
        let cluster = config.cluster()?;
        let service = config.qc_service()?;
        info!(service, "scaling down QC service");

        let resp = self.scaler.set_desired_count(cluster, service, 0).await?;
        Ok(DispatchOutcome::ServiceUpdated(resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avtrigger_config::{KEY_ECS_CLUSTER, KEY_ECS_SUBNET, KEY_QC_ECS_SERVICE};
    use avtrigger_core::{Medium, ServiceScaleRequest, TriggerError};
    use avtrigger_ecs::InMemoryCluster;
    use serde_json::json;

    const QC: &str = "digitized_av_qc";

    fn config() -> TriggerConfig {
        TriggerConfig::from_pairs([
            (KEY_ECS_CLUSTER, "default"),
            (KEY_ECS_SUBNET, "subnet-0abc"),
            (KEY_QC_ECS_SERVICE, QC),
        ])
    }

    async fn cluster_with_qc(desired: u32) -> InMemoryCluster {
        let cluster = InMemoryCluster::new("default");
        cluster.register_task_definition("digitized_av_validation").await;
        cluster.register_task_definition("digitized_av_packaging").await;
        cluster.create_service(QC, desired).await;
        cluster
    }

    #[tokio::test]
    async fn object_created_launches_one_task() {
        let cluster = cluster_with_qc(0).await;
        let dispatcher = Dispatcher::with_cluster(cluster.clone());
        let request = TaskLaunchRequest::validation(Medium::Audio, "rac-dev-av-upload-audio", "a.tar.gz");

        let outcome = dispatcher
            .dispatch(&config(), &Action::ObjectCreated(request.clone()))
            .await
            .unwrap();

        assert!(matches!(outcome, DispatchOutcome::TaskLaunched(ref r) if r.tasks.len() == 1));
        let launches = cluster.launches().await;
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].cluster, "default");
        assert_eq!(launches[0].subnet, "subnet-0abc");
        assert_eq!(launches[0].request, request);
    }

    #[tokio::test]
    async fn scale_up_only_when_idle() {
        let cluster = cluster_with_qc(0).await;
        let dispatcher = Dispatcher::with_cluster(cluster.clone());

        let outcome = dispatcher.dispatch(&config(), &Action::ValidationSuccess).await.unwrap();
        assert!(matches!(
            outcome,
            DispatchOutcome::ServiceUpdated(ref r) if r.service.desired_count == 1
        ));

        let outcome = dispatcher.dispatch(&config(), &Action::ValidationSuccess).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::ScaleSkipped);

        assert_eq!(cluster.scale_calls().await, vec![ServiceScaleRequest::up(QC)]);
        assert_eq!(cluster.describe_calls().await, 2);
    }

    #[tokio::test]
    async fn scale_up_skips_missing_service() {
        let cluster = InMemoryCluster::new("default");
        let dispatcher = Dispatcher::with_cluster(cluster.clone());

        let outcome = dispatcher.dispatch(&config(), &Action::ValidationSuccess).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::ScaleSkipped);
        assert!(cluster.scale_calls().await.is_empty());
    }

    #[tokio::test]
    async fn scale_down_is_unconditional() {
        for start in [0, 1, 3] {
            let cluster = cluster_with_qc(start).await;
            let dispatcher = Dispatcher::with_cluster(cluster.clone());

            let outcome = dispatcher.dispatch(&config(), &Action::QcComplete).await.unwrap();

            assert!(matches!(
                outcome,
                DispatchOutcome::ServiceUpdated(ref r) if r.service.desired_count == 0
            ));
            assert_eq!(cluster.describe_calls().await, 0);
            assert_eq!(cluster.desired_count(QC).await, Some(0));
        }
    }

    #[tokio::test]
    async fn noop_actions_call_nothing() {
        let cluster = cluster_with_qc(0).await;
        let dispatcher = Dispatcher::with_cluster(cluster.clone());

        for action in [
            Action::ObjectOtherEvent {
                event_name: "ObjectRemoved:Delete".to_string(),
            },
            Action::Unrecognized {
                service: QC.to_string(),
                outcome: Some("FAILURE".to_string()),
            },
        ] {
            let outcome = dispatcher.dispatch(&config(), &action).await.unwrap();
            assert_eq!(outcome, DispatchOutcome::NothingToDo);
        }
        assert_eq!(cluster.call_count().await, 0);
    }

    #[tokio::test]
    async fn missing_config_names_the_key() {
        let cluster = cluster_with_qc(0).await;
        let dispatcher = Dispatcher::with_cluster(cluster.clone());
        let config = TriggerConfig::from_pairs([(KEY_ECS_CLUSTER, "default")]);

        let err = dispatcher
            .dispatch(&config, &Action::QcComplete)
            .await
            .unwrap_err();
        assert!(matches!(err, TriggerError::MissingConfig(k) if k == "QC_ECS_SERVICE"));

        let request = TaskLaunchRequest::packaging("audio", "r", "1");
        let err = dispatcher
            .dispatch(&TriggerConfig::default(), &Action::QcSuccess(request))
            .await
            .unwrap_err();
        assert!(matches!(err, TriggerError::MissingConfig(k) if k == "ECS_CLUSTER"));
        assert_eq!(cluster.call_count().await, 0);
    }

    #[tokio::test]
    async fn orchestration_errors_propagate() {
        let cluster = InMemoryCluster::failing("default");
        let dispatcher = Dispatcher::with_cluster(cluster);

        let err = dispatcher
            .dispatch(&config(), &Action::QcComplete)
            .await
            .unwrap_err();
        assert!(matches!(err, TriggerError::Orchestration(_)));
    }

    #[test]
    fn replies() {
        let payload = json!({ "Records": [] });

        assert_eq!(
            DispatchOutcome::NothingToDo.to_reply("SNS", &payload).unwrap(),
            json!("Nothing to do for SNS event: {\"Records\":[]}")
        );
        assert_eq!(
            DispatchOutcome::ScaleSkipped.to_reply("SNS", &payload).unwrap(),
            Value::Null
        );
    }
}
