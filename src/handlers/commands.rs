// src/handlers/commands.rs

use super::{navigation, order_flow, recover, Command, Ctx};
use crate::messenger::Messenger;
use crate::models::VisitKind;
use crate::storage::leads;
use anyhow::Result;
use teloxide::utils::command::BotCommands;
use tracing::info;

pub const INTRO: &str =
    "Официальный помощник сайта yogita.ru\n\nВыберите пункт меню или введите команду /menu";

/// Обработка команд. Любая команда начинает диалог заново.
pub async fn handle_command<M: Messenger>(ctx: &Ctx<'_, M>, cmd: Command) {
    info!("Command {:?} from chat {}", cmd, ctx.chat_id());
    if let Err(e) = run_command(ctx, &cmd).await {
        recover(ctx, &format!("Command {:?}", cmd), e).await;
    }
}

async fn run_command<M: Messenger>(ctx: &Ctx<'_, M>, cmd: &Command) -> Result<()> {
    ctx.reset_state().await?;
    match cmd {
        Command::Start => start(ctx).await,
        Command::Menu => navigation::show_main_menu(ctx).await,
        Command::Order => order_flow::start_order(ctx, None).await,
        Command::Help => send_help(ctx).await,
    }
}

async fn start<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    let sender = &ctx.msg.sender;
    let greeting = match leads::register_visit(ctx.db, sender).await? {
        VisitKind::First => {
            info!("New user {} (@{})", sender.user_id, sender.username.as_deref().unwrap_or("-"));
            format!("Добро пожаловать, {}!", sender.first_name)
        }
        VisitKind::Repeat => format!("Рад вас снова видеть, {}!", sender.first_name),
    };

    ctx.say(greeting).await?;
    ctx.say(INTRO).await?;
    navigation::show_main_menu(ctx).await
}

pub async fn send_help<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    ctx.say(Command::descriptions().to_string()).await
}
