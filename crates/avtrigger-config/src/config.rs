//! Loaded trigger configuration.

use std::collections::HashMap;

use avtrigger_core::{TriggerError, TriggerResult};
use tracing::{debug, warn};

use crate::error::ConfigResult;
use crate::path::ConfigPath;
use crate::source::ParameterSource;

/// Cluster that runs the tasks and hosts the QC service.
pub const KEY_ECS_CLUSTER: &str = "ECS_CLUSTER";

/// Subnet launched tasks are placed in.
pub const KEY_ECS_SUBNET: &str = "ECS_SUBNET";

/// Name of the standing QC service scaled up and down.
pub const KEY_QC_ECS_SERVICE: &str = "QC_ECS_SERVICE";

/// Key-value configuration read from the parameter store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerConfig {
    values: HashMap<String, String>,
}

impl TriggerConfig {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Read every parameter directly beneath `path`.
    pub async fn load(source: &dyn ParameterSource, path: &ConfigPath) -> ConfigResult<Self> {
        let path = path.as_path();
        let params = source.parameters_by_path(&path).await?;
        let values: HashMap<String, String> = params
            .into_iter()
            .map(|p| (p.key().to_string(), p.value))
            .collect();
        debug!(%path, keys = values.len(), "configuration loaded");
        Ok(Self { values })
    }

    /// Like [`TriggerConfig::load`], but a store failure yields an empty
    /// configuration instead of an error.
    pub async fn load_lenient(source: &dyn ParameterSource, path: &ConfigPath) -> Self {
        match Self::load(source, path).await {
            Ok(config) => config,
            Err(e) => {
                warn!(%path, error = %e, "failed to load configuration, continuing with none");
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Fetch a key an action cannot run without.
    pub fn require(&self, key: &str) -> TriggerResult<&str> {
        self.get(key)
            .ok_or_else(|| TriggerError::MissingConfig(key.to_string()))
    }

    pub fn cluster(&self) -> TriggerResult<&str> {
        self.require(KEY_ECS_CLUSTER)
    }

    pub fn subnet(&self) -> TriggerResult<&str> {
        self.require(KEY_ECS_SUBNET)
    }

    pub fn qc_service(&self) -> TriggerResult<&str> {
        self.require(KEY_QC_ECS_SERVICE)
    }
}
