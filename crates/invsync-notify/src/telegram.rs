//! Telegram Bot API `sendMessage` notifier.

use std::time::Duration;

use async_trait::async_trait;
use invsync_core::TelegramConfig;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::NotifyError;
use crate::Notifier;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
const TIMEOUT_SECS: u64 = 15;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Posts each message to one chat. Use [`TelegramNotifier::new`] for
/// production or [`TelegramNotifier::with_base_url`] to point at a mock
/// server in tests.
pub struct TelegramNotifier {
    client: Client,
    send_url: Url,
    chat_id: String,
}

impl TelegramNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`NotifyError::InvalidBaseUrl`] if the token produces an
    /// invalid URL.
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`NotifyError::InvalidBaseUrl`] if `base_url` is invalid.
    pub fn with_base_url(config: &TelegramConfig, base_url: &str) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;
        let raw = format!(
            "{}/bot{}/sendMessage",
            base_url.trim_end_matches('/'),
            config.bot_token
        );
        // The URL embeds the bot token, so the error reports the base only.
        let send_url = Url::parse(&raw).map_err(|e| NotifyError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            send_url,
            chat_id: config.chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> bool {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
        };
        let outcome = self
            .client
            .post(self.send_url.clone())
            .json(&payload)
            .send()
            .await;

        match outcome {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "telegram rejected notification");
                false
            }
            Err(e) => {
                // reqwest errors carry the URL, which contains the bot token.
                tracing::warn!(error = %e.without_url(), "telegram notification failed");
                false
            }
        }
    }
}
