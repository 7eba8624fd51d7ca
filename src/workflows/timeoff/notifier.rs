use reqwest::blocking::Client;
use serde::Serialize;
use std::fmt::Debug;

use crate::config::WebhookConfig;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("webhook transport failure: {0}")]
    Transport(String),
}

/// Outbound seam for chat delivery; the workflow posts through this so tests
/// can capture the rendered digest without a network.
pub trait ChatNotifier: Debug {
    fn post_message(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts the digest text to the configured chat webhook. The webhook
/// contract treats exactly HTTP 200 as delivered.
pub struct HttpChatNotifier {
    client: Client,
    url: String,
}

impl HttpChatNotifier {
    pub fn new(config: &WebhookConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl Debug for HttpChatNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatNotifier").finish_non_exhaustive()
    }
}

impl ChatNotifier for HttpChatNotifier {
    fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { text })
            .send()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        let status = response.status();
        if status.as_u16() == 200 {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(NotifyError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
