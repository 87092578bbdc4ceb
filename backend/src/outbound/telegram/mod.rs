//! Telegram Bot API moderation notifier.

mod bot_notifier;
mod dto;

pub use bot_notifier::TelegramNotifier;
