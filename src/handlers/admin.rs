// src/handlers/admin.rs

use crate::messenger::{Keyboard, Messenger};
use crate::storage::OrderRow;
use teloxide::types::ChatId;
use tracing::{error, info, warn};

/// Текст уведомления о новой заявке для администратора
pub fn format_admin_notice(order: &OrderRow, username: Option<&str>) -> String {
    let mut lines = vec![
        format!("ВАМ НОВАЯ ЗАЯВКА №{}", order.order_id),
        format!("Имя: {}", order.name),
        format!("Телефон: {}", order.phone),
        format!(
            "Услуга: {}",
            order.service_type.as_deref().filter(|s| !s.is_empty()).unwrap_or("Не указана")
        ),
        format!("Дата: {}", order.created_date.format("%Y-%m-%d %H:%M:%S")),
    ];

    if let Some(comment) = order.comment.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("Комментарий: {}", comment));
    }

    let mut user_line = format!("ID пользователя: {}", order.user_id);
    if let Some(username) = username.filter(|u| !u.is_empty()) {
        user_line.push_str(&format!(" (@{})", username));
    }
    lines.push(user_line);

    lines.join("\n")
}

/// Пересылает заявку администратору. Ошибки только логируются.
pub async fn forward_order_to_admin<M: Messenger>(
    messenger: &M,
    admin_chat_id: Option<ChatId>,
    order: &OrderRow,
    username: Option<&str>,
) {
    let Some(admin) = admin_chat_id else {
        warn!("ADMIN_CHAT_ID is not set, order #{} not forwarded", order.order_id);
        return;
    };

    let text = format_admin_notice(order, username);
    match messenger.send_text(admin, text, Keyboard::Keep).await {
        Ok(()) => info!("Order #{} forwarded to admin", order.order_id),
        Err(e) => error!("Failed to forward order #{} to admin: {:#}", order.order_id, e),
    }
}
