// src/handlers/order_flow.rs

//! Заявка на обратный звонок: телефон → имя → тип занятия (если программа
//! не выбрана) → комментарий → сохранение и уведомление администратора.

use super::{admin, labels, navigation, Ctx, State};
use crate::messenger::{Button, Keyboard, Messenger, ReplyKeyboard};
use crate::models::{Content, NewOrder};
use crate::storage::{leads, OrderRow};
use crate::utils::{validate_name, validate_phone};
use anyhow::Result;
use tracing::{debug, error, info, warn};

const CONSENT_NOTICE: &str =
    "ВНИМАНИЕ! Введя номер телефона, вы соглашаетесь на обработку персональных данных.";

fn cancel_keyboard() -> Keyboard {
    Keyboard::Reply(ReplyKeyboard::grid(vec![Button::text(labels::CANCEL)], 1))
}

fn comment_keyboard() -> Keyboard {
    Keyboard::Reply(ReplyKeyboard::grid(
        vec![Button::text(labels::SKIP), Button::text(labels::CANCEL)],
        2,
    ))
}

fn service_keyboard() -> Keyboard {
    let mut buttons: Vec<Button> = labels::SERVICE_TYPES.iter().map(|s| Button::text(*s)).collect();
    buttons.push(Button::text(labels::CANCEL));
    Keyboard::Reply(ReplyKeyboard::grid(buttons, 2))
}

/// Начало заявки: общая (program = None) или на конкретную программу
pub async fn start_order<M: Messenger>(ctx: &Ctx<'_, M>, program: Option<String>) -> Result<()> {
    if let Err(e) = leads::ensure_user(ctx.db, &ctx.msg.sender).await {
        return ctx.report("Starting order", e, "Ошибка. Попробуйте позже").await;
    }

    let (text, keyboard) = match &program {
        None => (
            format!("ЗАЯВКА на ОБРАТНЫЙ ЗВОНОК\n\n{CONSENT_NOTICE}\nВведите ваш номер телефона:"),
            Keyboard::Reply(
                ReplyKeyboard::grid(
                    vec![
                        Button::contact(labels::SHARE_CONTACT_GENERAL),
                        Button::text(labels::CANCEL),
                    ],
                    2,
                )
                .one_time(),
            ),
        ),
        Some(title) => (
            format!("ЗАПИСЬ на программу: {title}\n\n{CONSENT_NOTICE}\nВведите ваш номер телефона:"),
            Keyboard::Reply(ReplyKeyboard::grid(
                vec![Button::contact(labels::SHARE_CONTACT), Button::text(labels::CANCEL)],
                2,
            )),
        ),
    };

    ctx.reply(text, keyboard).await?;
    info!(
        "Order started in chat {} (program: {})",
        ctx.chat_id(),
        program.as_deref().unwrap_or("-")
    );
    ctx.set_state(State::OrderPhone { program }).await
}

/// Один шаг заявки для текущего состояния. "Отмена" обрабатывается раньше.
pub async fn handle_order_step<M: Messenger>(ctx: &Ctx<'_, M>, state: State) -> Result<()> {
    match state {
        State::OrderPhone { program } => receive_phone(ctx, program).await,
        State::OrderName { program, phone } => receive_name(ctx, program, phone).await,
        State::OrderService { phone, name } => receive_service(ctx, phone, name).await,
        State::OrderComment { phone, name, service } => {
            receive_comment_and_save(ctx, phone, name, service).await
        }
        other => {
            warn!("Order step called outside of order flow: {:?}", other);
            navigation::show_main_menu(ctx).await
        }
    }
}

async fn receive_phone<M: Messenger>(ctx: &Ctx<'_, M>, program: Option<String>) -> Result<()> {
    let phone = match &ctx.msg.content {
        Content::Contact { phone } => phone.clone(),
        Content::Text(text) => match validate_phone(text) {
            Ok(phone) => phone,
            Err(e) => {
                debug!("Rejected phone in chat {}: {:?}", ctx.chat_id(), e);
                return ctx.say(e.to_string()).await;
            }
        },
        Content::Other => return ctx.say("Введите номер телефона").await,
    };

    ctx.reply("Введите ваше имя:", cancel_keyboard()).await?;
    ctx.set_state(State::OrderName { program, phone }).await
}

async fn receive_name<M: Messenger>(
    ctx: &Ctx<'_, M>,
    program: Option<String>,
    phone: String,
) -> Result<()> {
    let Some(name) = ctx.msg.text().and_then(validate_name) else {
        return ctx.say("Пожалуйста, введите корректное имя").await;
    };

    match program {
        Some(program) => {
            ctx.reply(
                format!(
                    "Запись на программу: {program}\n\n\
                     Можете добавить комментарий или нажмите 'Пропустить':"
                ),
                comment_keyboard(),
            )
            .await?;
            ctx.set_state(State::OrderComment { phone, name, service: program }).await
        }
        None => {
            ctx.reply("Выберите тип занятия:", service_keyboard()).await?;
            ctx.set_state(State::OrderService { phone, name }).await
        }
    }
}

async fn receive_service<M: Messenger>(ctx: &Ctx<'_, M>, phone: String, name: String) -> Result<()> {
    let Some(service) = ctx.msg.text().map(str::trim).filter(|s| !s.is_empty()) else {
        return ctx.reply("Выберите тип занятия:", service_keyboard()).await;
    };

    ctx.reply("Можете добавить комментарий или нажмите 'Пропустить':", comment_keyboard())
        .await?;
    ctx.set_state(State::OrderComment { phone, name, service: service.to_string() })
        .await
}

async fn receive_comment_and_save<M: Messenger>(
    ctx: &Ctx<'_, M>,
    phone: String,
    name: String,
    service: String,
) -> Result<()> {
    let Some(text) = ctx.msg.text() else {
        return ctx
            .reply("Можете добавить комментарий или нажмите 'Пропустить':", comment_keyboard())
            .await;
    };
    let comment = match text.trim() {
        labels::SKIP | "" => None,
        other => Some(other.to_string()),
    };

    let new_order = NewOrder {
        user_id: ctx.msg.sender.user_id,
        phone,
        name,
        service_type: Some(service),
        comment,
    };

    let saved = async {
        // Пользователь мог пропасть, если диалог пережил пересоздание базы
        leads::ensure_user(ctx.db, &ctx.msg.sender).await?;
        leads::create_order(ctx.db, &new_order).await
    }
    .await;

    let order = match saved {
        Ok(order) => order,
        Err(e) => {
            error!("Failed to save order for user {}: {}", new_order.user_id, e);
            ctx.reply(
                "Произошла ошибка при сохранении заявки. Попробуйте позже.",
                Keyboard::Remove,
            )
            .await?;
            ctx.reset_state().await?;
            return navigation::show_main_menu(ctx).await;
        }
    };

    info!(
        "Order #{} created for '{}' by user {}",
        order.order_id,
        order.service_type.as_deref().unwrap_or("-"),
        order.user_id
    );

    admin::forward_order_to_admin(
        ctx.messenger,
        ctx.admin_chat_id,
        &order,
        ctx.msg.sender.username.as_deref(),
    )
    .await;

    ctx.reply(confirmation_text(&order), Keyboard::Remove).await?;
    ctx.reset_state().await?;
    navigation::show_main_menu(ctx).await
}

/// Подтверждение для пользователя
pub fn confirmation_text(order: &OrderRow) -> String {
    let mut lines = vec![
        format!("Заявка №{} отправлена!", order.order_id),
        format!("Имя: {}", order.name),
        format!("Телефон: {}", order.phone),
        format!("Программа: {}", order.service_type.as_deref().unwrap_or("Не указана")),
    ];
    if let Some(comment) = &order.comment {
        lines.push(format!("Комментарий: {}", comment));
    }
    lines.push("\nМы свяжемся с вами в ближайшее время для подтверждения записи".to_string());
    lines.join("\n")
}

/// "Отмена" на любом шаге заявки
pub async fn cancel_order<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    ctx.reply("Запись отменена.", Keyboard::Remove).await?;
    ctx.reset_state().await?;
    info!("Order cancelled in chat {}", ctx.chat_id());
    navigation::show_main_menu(ctx).await
}
