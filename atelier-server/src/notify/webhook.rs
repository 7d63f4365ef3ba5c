//! Webhook Client
//!
//! Outbound call to the automation platform. Fire-and-forget on the
//! wire: the response body is never inspected, only transport-level
//! success is reported. The call carries a bounded timeout so a dead
//! endpoint cannot wedge a reservation flow.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook URL is not configured")]
    NotConfigured,

    #[error("Webhook request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// POST `<url>?<urlencoded params>`
    ///
    /// `Ok` means the request went out without a transport error — it
    /// says nothing about what the automation platform did with it.
    pub async fn fire(&self, params: &[(&str, &str)]) -> Result<(), WebhookError> {
        if !self.is_configured() {
            return Err(WebhookError::NotConfigured);
        }
        self.http.post(&self.url).query(params).send().await?;
        Ok(())
    }
}
