//! Webhook adapter for NotificationSink
//!
//! Delivers notifications and activity events to a configured webhook
//! endpoint as JSON, signing each payload with HMAC-SHA256 when a secret is
//! set. When no endpoint is configured the sink logs and drops everything,
//! which keeps local development working without a receiver.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::domain::ports::{Notification, NotificationSink};
use crate::error::NotifyError;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEADER: &str = "X-Futbol-Signature";

/// Webhook implementation of NotificationSink
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
    secret: Option<String>,
}

#[derive(Serialize)]
struct NotificationPayload<'a> {
    event: &'static str,
    notification: &'a Notification,
}

#[derive(Serialize)]
struct ActivityPayload<'a> {
    event: &'static str,
    kind: &'a str,
    message: &'a str,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            secret,
        }
    }

    fn sign(&self, body: &[u8]) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(body);
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    async fn post<T: Serialize>(&self, payload: &T) -> Result<(), NotifyError> {
        let Some(url) = &self.url else {
            tracing::debug!("No webhook URL configured, dropping notification");
            return Ok(());
        };

        let body = serde_json::to_vec(payload).map_err(|e| NotifyError::Api {
            status: 0,
            message: format!("Failed to serialize payload: {}", e),
        })?;

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.clone());

        if let Some(signature) = self.sign(&body) {
            request = request.header(SIGNATURE_HEADER, signature);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.post(&NotificationPayload {
            event: "notification",
            notification,
        })
        .await
    }

    async fn broadcast_activity(&self, kind: &str, message: &str) -> Result<(), NotifyError> {
        self.post(&ActivityPayload {
            event: "activity",
            kind,
            message,
        })
        .await
    }
}
