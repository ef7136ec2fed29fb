// src/services/webhook.rs

//! Webhook notification destination.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;

use crate::error::DeliveryError;
use crate::services::notify::{Destination, Notification};

/// Delivers notifications as JSON embed payloads to a webhook URL.
pub struct WebhookDestination {
    id: String,
    url: String,
    client: Client,
}

impl WebhookDestination {
    pub fn new(id: impl Into<String>, url: impl Into<String>, client: Client) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            client,
        }
    }

    fn payload(notification: &Notification) -> serde_json::Value {
        json!({
            "embeds": [{
                "title": notification.title,
                "description": format!("```\n{}\n```", notification.hash_listing),
                "fields": [{
                    "name": "Size",
                    "value": notification.size,
                    "inline": false,
                }],
                "footer": { "text": notification.footer },
            }]
        })
    }
}

#[async_trait]
impl Destination for WebhookDestination {
    fn id(&self) -> &str {
        &self.id
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(&Self::payload(notification))?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::new(format!(
                "webhook returned http {status}"
            )));
        }

        Ok(())
    }
}
