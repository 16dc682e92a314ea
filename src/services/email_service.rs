use crate::error::Result;
use reqwest::Client;
use serde_json::json;

/// Delivers transactional mail through an external mail webhook. When no
/// webhook is configured the service logs and drops the message, which
/// keeps local development from needing a mail provider.
#[derive(Clone)]
pub struct EmailService {
    client: Client,
    webhook_url: Option<String>,
}

impl EmailService {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    pub async fn send_password_reset(&self, to: &str, reset_link: &str) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            tracing::warn!("MAIL_WEBHOOK_URL not configured, dropping password reset email");
            return Ok(());
        };

        let payload = json!({
            "to": to,
            "subject": "Reset your REST API Trainer password",
            "body": format!(
                "Follow this link to choose a new password: {}\n\nIf you did not request a reset, ignore this email.",
                reset_link
            ),
        });

        let resp = self.client.post(url).json(&payload).send().await?;
        if !resp.status().is_success() {
            tracing::error!(status = %resp.status(), "Mail webhook rejected password reset email");
        }
        Ok(())
    }
}
