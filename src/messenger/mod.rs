// src/messenger/mod.rs

pub mod bot;
pub mod types;

pub use types::{Button, Keyboard, ReplyKeyboard};

use async_trait::async_trait;
use teloxide::types::ChatId;

/// Исходящая сторона мессенджера: всё, что обработчики отправляют пользователю
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: String, keyboard: Keyboard) -> anyhow::Result<()>;
    async fn send_photo(&self, chat_id: ChatId, url: &str, caption: &str) -> anyhow::Result<()>;
}
