//! Collaborator wiring and the Lambda runtime loop.

use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ecs::config::Region;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{info, warn};

use avtrigger_config::SsmParameterStore;
use avtrigger_dispatch::{Dispatcher, TriggerHandler};
use avtrigger_ecs::EcsOrchestrator;

use crate::settings::Settings;

/// Build a handler backed by the parameter store and ECS.
pub async fn build_handler(settings: &Settings) -> TriggerHandler {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .load()
        .await;
    handler_for(settings, &sdk_config)
}

/// Wire the collaborators from a loaded SDK configuration.
///
/// An unset stage or application segment is not fatal: the handler runs
/// without configuration and fails only the actions that need a key.
fn handler_for(settings: &Settings, sdk_config: &SdkConfig) -> TriggerHandler {
    let dispatcher = Dispatcher::with_cluster(EcsOrchestrator::new(aws_sdk_ecs::Client::new(sdk_config)));

    match settings.config_path() {
        Ok(config_path) => {
            info!(
                region = %settings.region,
                config_path = %config_path,
                "trigger initialized"
            );
            let parameters = SsmParameterStore::new(aws_sdk_ssm::Client::new(sdk_config));
            TriggerHandler::new(Arc::new(parameters), config_path, dispatcher)
        }
        Err(e) => {
            warn!(
                region = %settings.region,
                error = %e,
                "parameter path unset, running without configuration"
            );
            TriggerHandler::without_config(dispatcher)
        }
    }
}

/// Serve invocations until the runtime shuts the process down.
///
/// Errors are handed back to the runtime unchanged so its redelivery and
/// dead-letter policy applies.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let handler = build_handler(settings).await;

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move {
            handler
                .handle(&event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
