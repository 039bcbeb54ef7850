// Telegram Bot API data models (the subset this bot uses)

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method responds with
#[derive(Debug, Deserialize)]
pub struct ApiReply<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    fn new(text: &str, callback_data: &str) -> Self {
        Self {
            text: text.to_string(),
            callback_data: callback_data.to_string(),
        }
    }
}

/// Main menu shown on /start and after every callback action
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::new("📊 Status", "status")],
            vec![InlineKeyboardButton::new("🚀 Speed", "speed")],
            vec![InlineKeyboardButton::new("🔄 Restart", "restart")],
            vec![InlineKeyboardButton::new("🔔 Monitoring", "monitoring")],
        ],
    }
}

/// Explicit confirmation step shown before a container restart
pub fn restart_confirmation() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::new("✅ Yes, restart", "restart_confirm")],
            vec![InlineKeyboardButton::new("❌ Cancel", "cancel")],
        ],
    }
}
