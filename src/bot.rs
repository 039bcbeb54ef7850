// Inbound update dispatch and command routing

use crate::commands::CommandService;
use crate::error::Result;
use crate::telegram::client::TelegramClient;
use crate::telegram::models::{
    main_menu, restart_confirmation, CallbackQuery, InlineKeyboardMarkup, Message, Update,
};
use std::time::Duration;

/// Pause after a failed update retrieval before polling again
const TRANSPORT_BACKOFF: Duration = Duration::from_secs(5);

pub const ACCESS_DENIED: &str = "❌ Access denied";
const MENU_PROMPT: &str = "🤖 *wg-easy bot*\n\nPick an action:";
const RESTART_PROMPT: &str =
    "🔄 *Are you sure?*\n\nThis restarts the wg-easy container and briefly drops VPN connections.";
const RESTART_CANCELLED: &str = "❌ Restart cancelled";

/// Chat commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Status,
    Speed,
    Restart,
    Monitoring,
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "/start" => Some(Self::Start),
            "/status" => Some(Self::Status),
            "/speed" => Some(Self::Speed),
            "/restart" => Some(Self::Restart),
            "/monitoring" => Some(Self::Monitoring),
            _ => None,
        }
    }
}

/// Inline keyboard callback actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Status,
    Speed,
    Restart,
    RestartConfirm,
    Cancel,
    Monitoring,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "status" => Some(Self::Status),
            "speed" => Some(Self::Speed),
            "restart" => Some(Self::Restart),
            "restart_confirm" => Some(Self::RestartConfirm),
            "cancel" => Some(Self::Cancel),
            "monitoring" => Some(Self::Monitoring),
            _ => None,
        }
    }
}

/// A reply queued for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Outbound {
    fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    fn with_keyboard(chat_id: i64, text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

pub struct Bot {
    client: TelegramClient,
    commands: CommandService,
    admin_id: i64,
}

impl Bot {
    pub fn new(client: TelegramClient, commands: CommandService, admin_id: i64) -> Self {
        Self {
            client,
            commands,
            admin_id,
        }
    }

    /// Long-poll update loop. Updates are handled sequentially; a transport
    /// error is logged and followed by a short pause, never a process exit.
    pub async fn run(&self) -> Result<()> {
        let mut offset = 0i64;
        loop {
            let updates = match self.client.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::error!("update retrieval failed: {}", e);
                    tokio::time::sleep(TRANSPORT_BACKOFF).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                self.handle_update(update).await;
            }
        }
    }

    async fn handle_update(&self, update: Update) {
        let replies = if let Some(message) = update.message {
            self.handle_message(&message).await
        } else if let Some(callback) = update.callback_query {
            if let Err(e) = self.client.answer_callback(&callback.id).await {
                tracing::debug!("answer_callback failed: {}", e);
            }
            self.handle_callback(&callback).await
        } else {
            Vec::new()
        };

        for reply in replies {
            if let Err(e) = self
                .client
                .send_message(reply.chat_id, &reply.text, reply.keyboard.as_ref())
                .await
            {
                tracing::error!("failed to send reply: {}", e);
            }
        }
    }

    /// Route a text command. Non-administrators get a fixed denial and
    /// trigger nothing.
    pub async fn handle_message(&self, message: &Message) -> Vec<Outbound> {
        let chat_id = message.chat.id;
        if chat_id != self.admin_id {
            tracing::warn!("rejected command from chat {}", chat_id);
            return vec![Outbound::text(chat_id, ACCESS_DENIED)];
        }

        let Some(command) = message.text.as_deref().and_then(Command::parse) else {
            return Vec::new();
        };

        match command {
            Command::Start => vec![Outbound::with_keyboard(chat_id, MENU_PROMPT, main_menu())],
            Command::Status => vec![Outbound::text(
                chat_id,
                self.commands.status().await.render(),
            )],
            Command::Speed => vec![Outbound::text(
                chat_id,
                self.commands.speed_test().await.render(),
            )],
            // Restart always goes through explicit confirmation
            Command::Restart => vec![Outbound::with_keyboard(
                chat_id,
                RESTART_PROMPT,
                restart_confirmation(),
            )],
            Command::Monitoring => vec![Outbound::text(
                chat_id,
                self.commands.toggle_monitoring(),
            )],
        }
    }

    /// Route an inline keyboard press; the main menu is re-shown after
    /// every action.
    pub async fn handle_callback(&self, callback: &CallbackQuery) -> Vec<Outbound> {
        let Some(chat_id) = callback.message.as_ref().map(|m| m.chat.id) else {
            return Vec::new();
        };
        if callback.from.id != self.admin_id {
            tracing::warn!("rejected callback from user {}", callback.from.id);
            return vec![Outbound::text(chat_id, ACCESS_DENIED)];
        }

        let Some(action) = callback.data.as_deref().and_then(CallbackAction::parse) else {
            return Vec::new();
        };

        let mut replies = match action {
            CallbackAction::Status => vec![Outbound::text(
                chat_id,
                self.commands.status().await.render(),
            )],
            CallbackAction::Speed => vec![Outbound::text(
                chat_id,
                self.commands.speed_test().await.render(),
            )],
            CallbackAction::Restart => vec![Outbound::with_keyboard(
                chat_id,
                RESTART_PROMPT,
                restart_confirmation(),
            )],
            CallbackAction::RestartConfirm => vec![Outbound::text(
                chat_id,
                self.commands.restart().await.render(),
            )],
            CallbackAction::Cancel => vec![Outbound::text(chat_id, RESTART_CANCELLED)],
            CallbackAction::Monitoring => vec![Outbound::text(
                chat_id,
                self.commands.toggle_monitoring(),
            )],
        };

        replies.push(Outbound::with_keyboard(chat_id, MENU_PROMPT, main_menu()));
        replies
    }
}
