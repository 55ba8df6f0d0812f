// src/models.rs
use teloxide::types::{ChatId, Message, UserId};
use tracing::warn;

/// Профиль отправителя из Telegram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// Содержимое входящего сообщения, которое умеет обрабатывать бот
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Contact { phone: String },
    Other,
}

/// Входящее сообщение, отвязанное от транспорта
#[derive(Debug, Clone)]
pub struct Incoming {
    pub chat_id: ChatId,
    pub sender: Sender,
    pub content: Content,
}

impl Incoming {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Строит Incoming из Message. None для сообщений без отправителя (каналы).
    pub fn from_message(msg: &Message) -> Option<Self> {
        let from = msg.from.as_ref()?;
        let user_id = user_id_to_i64(from.id)?;
        let content = if let Some(text) = msg.text() {
            Content::Text(text.to_string())
        } else if let Some(contact) = msg.contact() {
            Content::Contact { phone: contact.phone_number.clone() }
        } else {
            Content::Other
        };

        Some(Self {
            chat_id: msg.chat.id,
            sender: Sender {
                user_id,
                username: from.username.clone(),
                first_name: from.first_name.clone(),
                last_name: from.last_name.clone(),
            },
            content,
        })
    }
}

/// Telegram id пользователя как ключ в базе. None, если не помещается в i64.
pub fn user_id_to_i64(id: UserId) -> Option<i64> {
    match i64::try_from(id.0) {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("User id {} does not fit into i64, message skipped", id.0);
            None
        }
    }
}

/// Вид визита, фиксируемый при /start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    First,
    Repeat,
}

impl VisitKind {
    pub fn title(self) -> &'static str {
        match self {
            VisitKind::First => "Первичный визит",
            VisitKind::Repeat => "Повторный визит",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VisitKind::First => "Новый пользователь запустил бота",
            VisitKind::Repeat => "Пользователь снова запустил бота",
        }
    }
}

/// Заявка до сохранения в БД
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: i64,
    pub phone: String,
    pub name: String,
    pub service_type: Option<String>,
    pub comment: Option<String>,
}
