use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A notification target as stored in the webhooks parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Webhook {
    pub url: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Request body to send for a webhook.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookBody {
    Empty,
    Text(String),
    Json(String),
}

impl Webhook {
    pub fn parse_list(raw: &str) -> Result<Vec<Webhook>> {
        Ok(serde_json::from_str(raw)?)
    }

    /// String payloads go out verbatim, anything else as JSON.
    pub fn body(&self) -> Result<WebhookBody> {
        Ok(match &self.data {
            serde_json::Value::Null => WebhookBody::Empty,
            serde_json::Value::String(text) => WebhookBody::Text(text.clone()),
            other => WebhookBody::Json(serde_json::to_string(other)?),
        })
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// POSTs `body` to `url` and returns the response status code.
    async fn post(&self, url: &str, body: WebhookBody) -> Result<u16>;
}

pub struct HttpWebhookClient {
    client: reqwest::Client,
}

impl HttpWebhookClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn post(&self, url: &str, body: WebhookBody) -> Result<u16> {
        let request = self.client.post(url);
        let request = match body {
            WebhookBody::Empty => request,
            WebhookBody::Text(text) => request.body(text),
            WebhookBody::Json(json) => request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json),
        };

        let response = request.send().await?;
        Ok(response.status().as_u16())
    }
}
