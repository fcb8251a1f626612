use async_trait::async_trait;
use aws_sdk_ssm::{types::ParameterType, Client as SsmClient};
#[cfg(test)]
use mockall::automock;

use crate::error::{AmiUpdaterError, Result};

/// Key/value parameter storage.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Writes `value` under `name`, replacing any previous value.
    /// Returns the version assigned by the store, if it reports one.
    async fn put_parameter(&self, name: &str, value: &str, description: &str)
        -> Result<Option<i64>>;

    /// Reads `name`. `Ok(None)` means the parameter does not exist.
    async fn get_parameter(&self, name: &str, with_decryption: bool) -> Result<Option<String>>;
}

pub struct SsmParameterStore {
    client: SsmClient,
}

impl SsmParameterStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn put_parameter(
        &self,
        name: &str,
        value: &str,
        description: &str,
    ) -> Result<Option<i64>> {
        let output = self
            .client
            .put_parameter()
            .name(name)
            .description(description)
            .value(value)
            .r#type(ParameterType::String)
            .overwrite(true)
            .send()
            .await
            .map_err(|e| {
                AmiUpdaterError::ParameterStore(format!(
                    "put {}: {}",
                    name,
                    aws_sdk_ssm::error::DisplayErrorContext(e)
                ))
            })?;

        Ok(Some(output.version()).filter(|v| *v != 0))
    }

    async fn get_parameter(&self, name: &str, with_decryption: bool) -> Result<Option<String>> {
        let result = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(with_decryption)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output
                .parameter()
                .and_then(|p| p.value().map(String::from))),
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_parameter_not_found())
                    .unwrap_or(false) =>
            {
                Ok(None)
            }
            Err(e) => Err(AmiUpdaterError::ParameterStore(format!(
                "get {}: {}",
                name,
                aws_sdk_ssm::error::DisplayErrorContext(e)
            ))),
        }
    }
}
