// Outbound value bet alerts

use corners_models::{CornersError, ValueBet};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Delivery channel for value-bet alerts.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, bet: &ValueBet) -> Result<(), CornersError>;
}

/// Posts alerts to a Discord webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// Client posting to `webhook_url` with a per-request timeout.
    pub fn new(webhook_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, webhook_url })
    }
}

impl Notifier for DiscordNotifier {
    async fn notify(&self, bet: &ValueBet) -> Result<(), CornersError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "content": bet.alert_message() }))
            .send()
            .await
            .map_err(|e| CornersError::Notification(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CornersError::Notification(format!(
                "webhook returned HTTP {}",
                response.status()
            )));
        }

        info!("✅ Discord alert sent for {}", bet.match_label);
        Ok(())
    }
}

/// Writes alerts to the log when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, bet: &ValueBet) -> Result<(), CornersError> {
        info!("📣 {}", bet.alert_message().replace('\n', " | "));
        Ok(())
    }
}
