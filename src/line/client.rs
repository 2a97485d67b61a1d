use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

const API_BASE: &str = "https://api.line.me/v2/bot";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
}

/// The slice of the LINE Messaging API the bot talks to.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Profile>;
    async fn reply_message(&self, reply_token: &str, text: &str) -> Result<()>;
}

pub struct LineClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl LineClient {
    pub fn new(access_token: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(access_token, API_BASE.to_string(), timeout)
    }

    /// Every call gives up after `timeout`, so a stalled API cannot hold the
    /// store lock indefinitely.
    pub fn with_base_url(access_token: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            access_token,
            base_url,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BotError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl MessagingApi for LineClient {
    async fn get_profile(&self, user_id: &str) -> Result<Profile> {
        let url = format!("{}/profile/{}", self.base_url, user_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let profile: Profile = ensure_success(response).await?.json().await?;
        tracing::debug!("Resolved {} as {}", profile.user_id, profile.display_name);
        Ok(profile)
    }

    async fn reply_message(&self, reply_token: &str, text: &str) -> Result<()> {
        let payload = ReplyRequest {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(format!("{}/message/reply", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
