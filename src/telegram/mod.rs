// Telegram Bot API integration module

pub mod client;
pub mod models;

#[cfg(test)]
mod tests;

pub use client::{AdminNotifier, TelegramClient};
pub use models::{
    main_menu, restart_confirmation, CallbackQuery, Chat, InlineKeyboardButton,
    InlineKeyboardMarkup, Message, Update, User,
};
