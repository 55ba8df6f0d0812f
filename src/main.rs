use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use yogita_bot::handlers::{Command, State};
use yogita_bot::{config, logger, storage, telegram};

#[tokio::main]
async fn main() -> Result<()> {
    // 1) конфиг и логгер
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;
    info!("Запуск бота");

    // 2) SQLite: контент, пользователи, заявки
    let db = storage::Db::connect_with_retry(
        &cfg.sqlite_path,
        cfg.db_init_attempts,
        Duration::from_secs(cfg.db_init_retry_delay_secs),
    )
    .await?;

    // 3) состояния диалогов в той же базе
    let dialogues: Arc<ErasedStorage<State>> =
        SqliteStorage::<Json>::open(&cfg.sqlite_path, Json).await?.erase();

    // 4) Telegram-бот
    let bot = Bot::new(&cfg.telegram_token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let admin_chat_id = cfg.admin_chat_id.map(ChatId);
    if admin_chat_id.is_none() {
        warn!("ADMIN_CHAT_ID is not set, orders will not be forwarded");
    }

    // 5) диспетчер до Ctrl-C
    telegram::run(bot, db.clone(), dialogues, admin_chat_id).await;

    db.close().await;
    info!("Бот остановлен");
    Ok(())
}
