// src/handlers/mod.rs

pub mod admin;
pub mod commands;
pub mod info;
pub mod messages;
pub mod navigation;
pub mod order_flow;

pub use self::commands::handle_command;
pub use self::messages::handle_message;

use crate::messenger::{Keyboard, Messenger};
use crate::models::Incoming;
use crate::storage::Db;
use crate::utils::{split_message, TELEGRAM_TEXT_LIMIT};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, ErasedStorage};
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tracing::error;

/// Подписи кнопок, по которым идёт диспетчеризация текста
pub mod labels {
    pub const ORDER: &str = "Записаться на занятие";
    pub const BACK: &str = "Назад";
    pub const BACK_TO_MENU: &str = "Назад в меню";
    pub const BACK_TO_FAQ: &str = "Назад к вопросам";
    pub const CANCEL: &str = "Отмена";
    pub const SKIP: &str = "Пропустить";
    pub const HELP: &str = "Помощь";
    pub const SHARE_CONTACT_GENERAL: &str = "Отправить: Я согласн(а) на обработку данных";
    pub const SHARE_CONTACT: &str = "Отправить контакт";

    /// Префикс кнопки записи на конкретную программу: Записаться на "<название>"
    pub const PROGRAM_ORDER_PREFIX: &str = "Записаться на \"";

    /// Типы занятий, если программа не выбрана заранее
    pub const SERVICE_TYPES: [&str; 5] = [
        "Групповое занятие",
        "Персональное занятие",
        "Занятие у Топ Мастера",
        "Мероприятие или Ретрит",
        "Другое",
    ];

    pub fn program_order(title: &str) -> String {
        format!("{PROGRAM_ORDER_PREFIX}{title}\"")
    }

    /// Название программы из кнопки Записаться на "<название>"
    pub fn parse_program_order(text: &str) -> Option<String> {
        text.strip_prefix(PROGRAM_ORDER_PREFIX)
            .map(|rest| rest.replace('"', ""))
    }
}

/// Состояние диалога. Хранится во внешнем хранилище teloxide, не в процессе.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    #[default]
    Idle,
    /// На экране подменю: форматы, длительности, инфо-разделы, FAQ
    SubmenuSelection,
    /// На экране список программ или карточка программы
    ProgramSelection,
    OrderPhone { program: Option<String> },
    OrderName { program: Option<String>, phone: String },
    OrderService { phone: String, name: String },
    OrderComment { phone: String, name: String, service: String },
}

impl State {
    pub fn is_order(&self) -> bool {
        matches!(
            self,
            State::OrderPhone { .. }
                | State::OrderName { .. }
                | State::OrderService { .. }
                | State::OrderComment { .. }
        )
    }
}

pub type BotDialogue = Dialogue<State, ErasedStorage<State>>;

/// Все доступные команды бота
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "Запустить бота")]
    Start,
    #[command(description = "Открыть меню")]
    Menu,
    #[command(description = "Записаться на занятие")]
    Order,
    #[command(description = "Помощь")]
    Help,
}

/// Всё, что нужно обработчику одного входящего сообщения
pub struct Ctx<'a, M: Messenger> {
    pub messenger: &'a M,
    pub db: &'a Db,
    pub dialogue: &'a BotDialogue,
    pub admin_chat_id: Option<ChatId>,
    pub msg: &'a Incoming,
}

impl<M: Messenger> Ctx<'_, M> {
    pub fn chat_id(&self) -> ChatId {
        self.msg.chat_id
    }

    /// Длинный текст уходит несколькими сообщениями, клавиатура прикрепляется к последнему
    pub async fn reply(&self, text: impl Into<String> + Send, keyboard: Keyboard) -> Result<()> {
        let text: String = text.into();
        let mut chunks = split_message(&text, TELEGRAM_TEXT_LIMIT);
        let last = chunks.pop().unwrap_or_default();
        for chunk in chunks {
            self.messenger.send_text(self.chat_id(), chunk, Keyboard::Keep).await?;
        }
        self.messenger.send_text(self.chat_id(), last, keyboard).await
    }

    /// Сообщение без изменения клавиатуры
    pub async fn say(&self, text: impl Into<String> + Send) -> Result<()> {
        self.reply(text, Keyboard::Keep).await
    }

    pub async fn state(&self) -> Result<State> {
        self.dialogue
            .get_or_default()
            .await
            .map_err(|e| anyhow!("dialogue storage read failed: {}", e))
    }

    pub async fn set_state(&self, state: State) -> Result<()> {
        self.dialogue
            .update(state)
            .await
            .map_err(|e| anyhow!("dialogue storage write failed: {}", e))
    }

    /// Сбрасывает диалог в Idle. Работает и для чата без сохранённого состояния.
    pub async fn reset_state(&self) -> Result<()> {
        self.dialogue
            .reset()
            .await
            .map_err(|e| anyhow!("dialogue storage reset failed: {}", e))
    }

    /// Логирует ошибку экрана и показывает пользователю короткое сообщение
    pub async fn report(&self, what: &str, err: impl Into<anyhow::Error>, user_text: &str) -> Result<()> {
        error!("{} failed for chat {}: {:#}", what, self.chat_id(), err.into());
        self.say(user_text).await
    }
}

/// Последний рубеж: лог, общее сообщение об ошибке, сброс диалога и главное меню.
/// Ошибка дальше не уходит.
pub(crate) async fn recover<M: Messenger>(ctx: &Ctx<'_, M>, what: &str, err: anyhow::Error) {
    error!("{} failed for chat {}: {:#}", what, ctx.chat_id(), err);

    if let Err(e) = ctx.reset_state().await {
        error!("Failed to reset dialogue for chat {}: {:#}", ctx.chat_id(), e);
    }
    if let Err(e) = ctx.say("Ошибка при обработке запроса. Попробуйте позже.").await {
        error!("Failed to send error notice to chat {}: {:#}", ctx.chat_id(), e);
        return;
    }
    if let Err(e) = navigation::show_main_menu(ctx).await {
        error!("Failed to show main menu after error for chat {}: {:#}", ctx.chat_id(), e);
    } else {
        tracing::info!("Chat {} returned to main menu after error", ctx.chat_id());
    }
}
