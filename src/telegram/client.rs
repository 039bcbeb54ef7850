// Telegram Bot API client

use crate::error::{Result, SentryError};
use crate::monitor::Notifier;
use crate::telegram::models::{ApiReply, InlineKeyboardMarkup, Update};
use async_trait::async_trait;
use std::time::Duration;

/// Long-poll wait requested from the API, in seconds
const POLL_WAIT_SECS: u64 = 30;
/// Client-side ceiling; must outlast the long poll
const HTTP_TIMEOUT: Duration = Duration::from_secs(40);
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(format!("https://api.telegram.org/bot{}", token))
    }

    /// Point the client at a different API host (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("wgsentry")
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send a Markdown message, optionally with an inline keyboard
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        let mut form = vec![
            ("chat_id", chat_id.to_string()),
            ("text", text.to_string()),
            ("parse_mode", "Markdown".to_string()),
        ];
        if let Some(kb) = keyboard {
            form.push(("reply_markup", serde_json::to_string(kb)?));
        }

        let response = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .timeout(SEND_TIMEOUT)
            .form(&form)
            .send()
            .await
            .map_err(|e| SentryError::Telegram(format!("sendMessage failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SentryError::Telegram(format!(
                "sendMessage returned status {}",
                response.status()
            ))
            .into());
        }
        Ok(())
    }

    /// Long-poll for updates with id greater than `offset - 1`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let response = self
            .http
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_WAIT_SECS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SentryError::Telegram(format!("getUpdates failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SentryError::Telegram(format!(
                "getUpdates returned status {}",
                response.status()
            ))
            .into());
        }

        let reply: ApiReply<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| SentryError::Telegram(format!("getUpdates decode failed: {}", e)))?;

        if !reply.ok {
            return Err(SentryError::Telegram(
                reply
                    .description
                    .unwrap_or_else(|| "getUpdates rejected".to_string()),
            )
            .into());
        }
        Ok(reply.result.unwrap_or_default())
    }

    /// Acknowledge a callback so the client stops its progress spinner
    pub async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/answerCallbackQuery", self.base_url))
            .timeout(SEND_TIMEOUT)
            .form(&[("callback_query_id", callback_id)])
            .send()
            .await
            .map_err(|e| SentryError::Telegram(format!("answerCallbackQuery failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SentryError::Telegram(format!(
                "answerCallbackQuery returned status {}",
                response.status()
            ))
            .into());
        }
        Ok(())
    }
}

/// Delivers monitor alerts to the administrator chat, best effort
pub struct AdminNotifier {
    client: TelegramClient,
    admin_id: i64,
}

impl AdminNotifier {
    pub fn new(client: TelegramClient, admin_id: i64) -> Self {
        Self { client, admin_id }
    }
}

#[async_trait]
impl Notifier for AdminNotifier {
    async fn notify(&self, text: &str) -> bool {
        match self.client.send_message(self.admin_id, text, None).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("alert delivery failed: {}", e);
                false
            }
        }
    }
}
