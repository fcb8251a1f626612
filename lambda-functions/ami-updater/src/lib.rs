pub mod config;
pub mod error;
pub mod event;
pub mod store;
pub mod webhook;

use aws_lambda_events::event::sns::SnsEvent;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

pub use config::Config;
pub use error::{AmiUpdaterError, Result};
pub use event::{AmiRelease, AmiSet, RegionAmi, SelectedAmi};
pub use store::{ParameterStore, SsmParameterStore};
pub use webhook::{HttpWebhookClient, Webhook, WebhookBody, WebhookClient};

pub const AMI_PARAMETER_DESCRIPTION: &str = "ECS instance AMI id";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub status: String,
    pub region: String,
    pub ami_id: Option<String>,
    pub ami_name: Option<String>,
    pub parameter_version: Option<i64>,
    pub webhooks_notified: usize,
    pub timestamp: String,
}

impl Response {
    fn no_match(region: &str) -> Self {
        Self {
            status: "no_match".to_string(),
            region: region.to_string(),
            ami_id: None,
            ami_name: None,
            parameter_version: None,
            webhooks_notified: 0,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub struct AmiUpdaterService<S, W> {
    store: S,
    webhooks: W,
    config: Config,
}

impl<S, W> AmiUpdaterService<S, W>
where
    S: ParameterStore,
    W: WebhookClient,
{
    pub fn new(store: S, webhooks: W, config: Config) -> Self {
        Self {
            store,
            webhooks,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn handle_event(&self, event: &SnsEvent) -> Result<Response> {
        let release = AmiRelease::from_event(event)?;
        info!(
            ami_sets = release.ecs_amis.len(),
            agent_version = release
                .ecs_agent
                .as_ref()
                .map(|a| a.release_version.as_str()),
            "Received ECS AMI release"
        );

        let region = &self.config.region;
        let Some(selected) = release.select_for_region(region)? else {
            warn!(region = %region, "No suitable AMI found");
            return Ok(Response::no_match(region));
        };

        info!(
            region = %region,
            ami_id = %selected.image_id,
            ami_name = %selected.name,
            "The new AMI for {} is {} ({})",
            region,
            selected.image_id,
            selected.name
        );

        let version = self.publish_ami(&selected).await?;
        let notified = self.notify_webhooks().await?;

        Ok(Response {
            status: "updated".to_string(),
            region: region.clone(),
            ami_id: Some(selected.image_id),
            ami_name: Some(selected.name),
            parameter_version: version,
            webhooks_notified: notified,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    pub async fn publish_ami(&self, selected: &SelectedAmi) -> Result<Option<i64>> {
        let name = &self.config.ami_parameter;
        let version = self
            .store
            .put_parameter(name, &selected.image_id, AMI_PARAMETER_DESCRIPTION)
            .await?;

        info!(
            parameter = %name,
            ami_id = %selected.image_id,
            version = ?version,
            "Stored parameter {}={}",
            name,
            selected.image_id
        );
        Ok(version)
    }

    /// Sends every configured webhook and returns how many answered 2xx.
    /// Delivery failures are logged, never returned; only reading or parsing
    /// the webhook list can fail.
    pub async fn notify_webhooks(&self) -> Result<usize> {
        let name = &self.config.webhooks_parameter;
        let Some(raw) = self.store.get_parameter(name, true).await? else {
            info!(parameter = %name, "No webhooks configured");
            return Ok(0);
        };

        let hooks = Webhook::parse_list(&raw)?;
        info!(count = hooks.len(), "Sending webhooks");

        let mut delivered = 0;
        for hook in &hooks {
            match self.webhooks.post(&hook.url, hook.body()?).await {
                Ok(status) if (200..300).contains(&status) => {
                    info!(url = %hook.url, status, "Webhook delivered");
                    delivered += 1;
                }
                Ok(status) => {
                    warn!(url = %hook.url, status, "Webhook returned non-success status");
                }
                Err(e) => {
                    warn!(url = %hook.url, error = %e, "Webhook request failed");
                }
            }
        }

        info!(delivered, attempted = hooks.len(), "Webhooks sent");
        Ok(delivered)
    }
}
