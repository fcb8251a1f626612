use bon::Builder;

use crate::error::{AmiUpdaterError, Result};

pub const DEFAULT_AMI_PARAMETER: &str = "ECS_AMI_ID";
pub const DEFAULT_WEBHOOKS_PARAMETER: &str = "ECS_AMI_WEBHOOKS";

/// Runtime settings, resolved once per cold start.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Config {
    /// Region whose AMI gets published
    #[builder(into)]
    pub region: String,

    #[builder(into, default = DEFAULT_AMI_PARAMETER.to_string())]
    pub ami_parameter: String,

    #[builder(into, default = DEFAULT_WEBHOOKS_PARAMETER.to_string())]
    pub webhooks_parameter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = lookup("AWS_REGION")
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AmiUpdaterError::Config("AWS_REGION is not set".to_string()))?;

        Ok(Self::builder()
            .region(region)
            .ami_parameter(
                lookup("ECS_AMI_SSM_KEY").unwrap_or_else(|| DEFAULT_AMI_PARAMETER.to_string()),
            )
            .webhooks_parameter(
                lookup("ECS_AMI_WEBHOOKS_SSM_KEY")
                    .unwrap_or_else(|| DEFAULT_WEBHOOKS_PARAMETER.to_string()),
            )
            .build())
    }
}
