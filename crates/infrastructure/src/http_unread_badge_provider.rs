use async_trait::async_trait;
use serde::Deserialize;

use academia_application::UnreadBadgeProvider;
use academia_core::{AppError, AppResult};

/// HTTP-based unread badge provider calling the messaging collaborator.
pub struct HttpUnreadBadgeProvider {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpUnreadBadgeProvider {
    /// Creates a provider against the messaging service base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UnreadCountResponse {
    count: u32,
}

#[async_trait]
impl UnreadBadgeProvider for HttpUnreadBadgeProvider {
    async fn unread_count(&self, subject: &str) -> AppResult<u32> {
        let url = format!("{}/api/messages/unread-count", self.base_url);
        let response = self
            .http_client
            .get(url)
            .query(&[("subject", subject)])
            .send()
            .await
            .map_err(|error| AppError::Store(format!("unread count request failed: {error}")))?;

        if !response.status().is_success() {
            return Err(AppError::Store(format!(
                "unread count request returned status {}",
                response.status()
            )));
        }

        let payload: UnreadCountResponse = response.json().await.map_err(|error| {
            AppError::Store(format!("unread count response is invalid: {error}"))
        })?;

        Ok(payload.count)
    }
}
