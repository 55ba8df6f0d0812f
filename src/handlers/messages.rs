// src/handlers/messages.rs

use super::{commands, info, labels, navigation, order_flow, recover, Ctx, State};
use crate::messenger::Messenger;
use crate::storage::content;
use anyhow::Result;
use tracing::debug;

/// Все сообщения, кроме известных команд
pub async fn handle_message<M: Messenger>(ctx: &Ctx<'_, M>) {
    if let Err(e) = route(ctx).await {
        recover(ctx, "Message handling", e).await;
    }
}

async fn route<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    let state = ctx.state().await?;
    let text = ctx.msg.text().map(str::trim);
    debug!("Chat {} in {:?} sent {:?}", ctx.chat_id(), state, text);

    // Запись доступна из любого состояния
    if text == Some(labels::ORDER) {
        return order_flow::start_order(ctx, None).await;
    }

    if state.is_order() {
        if text == Some(labels::CANCEL) {
            return order_flow::cancel_order(ctx).await;
        }
        return order_flow::handle_order_step(ctx, state).await;
    }

    // Вне заявки обрабатывается только текст
    let Some(text) = text else {
        debug!("Ignoring non-text message in chat {}", ctx.chat_id());
        return Ok(());
    };

    if state == State::SubmenuSelection {
        if text == labels::BACK {
            return navigation::back_navigation(ctx, &state).await;
        }
        if let Some(faq) = content::faq_by_question(ctx.db, text).await? {
            return info::display_faq_answer(ctx, &faq).await;
        }
    }

    match text {
        labels::BACK_TO_FAQ => info::display_faq_menu(ctx).await,
        labels::HELP => commands::send_help(ctx).await,
        t if t.starts_with('/') => {
            ctx.say("Такой команды нет. Введите /help для списка команд.").await
        }
        t => navigation::handle_menu_selection(ctx, &state, t).await,
    }
}
