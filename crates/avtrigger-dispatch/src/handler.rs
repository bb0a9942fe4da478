//! Invocation entry point.
//!
//! `TriggerHandler::handle` is what the runtime calls once per event:
//! load configuration (never fails), classify the payload, dispatch, and
//! return the reply as a JSON string. A handler built without a parameter
//! path runs every event against an empty configuration.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use avtrigger_config::{ConfigPath, ParameterSource, TriggerConfig};
use avtrigger_core::{InboundEvent, TriggerResult};

use crate::action::classify;
use crate::dispatcher::Dispatcher;

#[derive(Clone)]
struct ConfigSource {
    parameters: Arc<dyn ParameterSource>,
    path: ConfigPath,
}

/// Everything one invocation needs, shared across invocations.
#[derive(Clone)]
pub struct TriggerHandler {
    config: Option<ConfigSource>,
    dispatcher: Dispatcher,
}

impl TriggerHandler {
    pub fn new(
        parameters: Arc<dyn ParameterSource>,
        config_path: ConfigPath,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            config: Some(ConfigSource {
                parameters,
                path: config_path,
            }),
            dispatcher,
        }
    }

    /// A handler with no parameter path. Actions that need a key fail
    /// with `MissingConfig`; no-ops still succeed.
    pub fn without_config(dispatcher: Dispatcher) -> Self {
        Self {
            config: None,
            dispatcher,
        }
    }

    async fn load_config(&self) -> TriggerConfig {
        match &self.config {
            Some(source) => TriggerConfig::load_lenient(source.parameters.as_ref(), &source.path).await,
            None => TriggerConfig::default(),
        }
    }

    /// Handle one inbound event and return the stringified reply.
    pub async fn handle(&self, payload: &Value) -> TriggerResult<String> {
        let config = self.load_config().await;

        let event = InboundEvent::from_value(payload)?;
        let source = event.source_label();
        info!(source, event = %payload, "received event");

        let action = classify(&event)?;
        let outcome = self.dispatcher.dispatch(&config, &action).await?;

        let reply = outcome.to_reply(source, payload)?;
        info!(source, %reply, "event handled");
        Ok(reply.to_string())
    }
}
