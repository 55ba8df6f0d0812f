// src/telegram.rs

use crate::handlers::{self, BotDialogue, Command, Ctx, State};
use crate::models::Incoming;
use crate::storage::Db;
use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::ErasedStorage,
    dptree,
    prelude::*,
    types::Message,
};
use tracing::{debug, info};

/// Чат администратора для заявок (зависимость диспетчера)
#[derive(Debug, Clone, Copy)]
pub struct AdminChat(pub Option<ChatId>);

pub async fn run(
    bot: Bot,
    db: Db,
    storage: Arc<ErasedStorage<State>>,
    admin_chat_id: Option<ChatId>,
) {
    // Сначала известные команды, затем всё остальное
    let handler = Update::filter_message()
        .enter_dialogue::<Message, ErasedStorage<State>, State>()
        .branch(dptree::entry().filter_command::<Command>().endpoint(on_command))
        .branch(dptree::endpoint(on_message));

    info!("Dispatcher started");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![db, storage, AdminChat(admin_chat_id)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("Dispatcher stopped");
}

async fn on_command(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    cmd: Command,
    db: Db,
    admin: AdminChat,
) -> ResponseResult<()> {
    let Some(incoming) = Incoming::from_message(&msg) else {
        debug!("Command without sender in chat {}", msg.chat.id);
        return respond(());
    };
    let ctx = Ctx {
        messenger: &bot,
        db: &db,
        dialogue: &dialogue,
        admin_chat_id: admin.0,
        msg: &incoming,
    };
    handlers::handle_command(&ctx, cmd).await;
    respond(())
}

async fn on_message(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    db: Db,
    admin: AdminChat,
) -> ResponseResult<()> {
    let Some(incoming) = Incoming::from_message(&msg) else {
        debug!("Message without sender in chat {}", msg.chat.id);
        return respond(());
    };
    let ctx = Ctx {
        messenger: &bot,
        db: &db,
        dialogue: &dialogue,
        admin_chat_id: admin.0,
        msg: &incoming,
    };
    handlers::handle_message(&ctx).await;
    respond(())
}
