//! Parameter source backed by the AWS Systems Manager parameter store.

use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::DisplayErrorContext;
use tracing::debug;

use crate::error::ConfigError;
use crate::source::{Parameter, ParameterFuture, ParameterSource};

/// Reads parameters with `GetParametersByPath`, following every page.
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ParameterSource for SsmParameterStore {
    fn parameters_by_path<'a>(&'a self, path: &'a str) -> ParameterFuture<'a> {
        Box::pin(async move {
            let mut params = Vec::new();
            let mut next_token: Option<String> = None;

            loop {
                let page = self
                    .client
                    .get_parameters_by_path()
                    .path(path)
                    .recursive(false)
                    .with_decryption(true)
                    .set_next_token(next_token.take())
                    .send()
                    .await
                    .map_err(|e| ConfigError::Store(DisplayErrorContext(&e).to_string()))?;

                for p in page.parameters() {
                    if let (Some(name), Some(value)) = (p.name(), p.value()) {
                        params.push(Parameter::new(name, value));
                    }
                }

                match page.next_token() {
                    Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                    _ => break,
                }
            }

            debug!(path, count = params.len(), "read parameters");
            Ok(params)
        })
    }
}
