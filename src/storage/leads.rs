// src/storage/leads.rs

//! Пользователи, визиты и заявки: всё, что бот пишет в базу сам.

use super::db::Db;
use super::schema::{OrderRow, UserRow, VisitRow};
use crate::models::{NewOrder, Sender, VisitKind};
use chrono::{Local, NaiveDateTime, Timelike};
use sqlx::Error;
use tracing::info;

/// Текущее локальное время без микросекунд
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub async fn get_user(db: &Db, user_id: i64) -> Result<Option<UserRow>, Error> {
    sqlx::query_as::<_, UserRow>(
        r#"SELECT user_id, username, first_name, last_name FROM "user" WHERE user_id = ?"#,
    )
    .bind(user_id)
    .fetch_optional(&db.pool)
    .await
}

/// /start: создаёт пользователя или обновляет профиль, пишет визит.
/// Возвращает вид визита. Каждая запись в базу одним оператором, без общей транзакции.
pub async fn register_visit(db: &Db, sender: &Sender) -> Result<VisitKind, Error> {
    let inserted = sqlx::query(
        r#"INSERT OR IGNORE INTO "user" (user_id, username, first_name, last_name) VALUES (?, ?, ?, ?)"#,
    )
    .bind(sender.user_id)
    .bind(&sender.username)
    .bind(&sender.first_name)
    .bind(&sender.last_name)
    .execute(&db.pool)
    .await?
    .rows_affected();

    let kind = if inserted > 0 {
        VisitKind::First
    } else {
        sqlx::query(
            r#"UPDATE "user" SET username = ?, first_name = ?, last_name = ? WHERE user_id = ?"#,
        )
        .bind(&sender.username)
        .bind(&sender.first_name)
        .bind(&sender.last_name)
        .bind(sender.user_id)
        .execute(&db.pool)
        .await?;
        VisitKind::Repeat
    };

    sqlx::query(r#"INSERT INTO "date" (user_id, title, description, due_date) VALUES (?, ?, ?, ?)"#)
        .bind(sender.user_id)
        .bind(kind.title())
        .bind(kind.description())
        .bind(now())
        .execute(&db.pool)
        .await?;

    Ok(kind)
}

/// Гарантирует наличие пользователя (перед оформлением заявки). Профиль не трогает.
pub async fn ensure_user(db: &Db, sender: &Sender) -> Result<(), Error> {
    let inserted = sqlx::query(
        r#"INSERT OR IGNORE INTO "user" (user_id, username, first_name, last_name) VALUES (?, ?, ?, ?)"#,
    )
    .bind(sender.user_id)
    .bind(&sender.username)
    .bind(&sender.first_name)
    .bind(&sender.last_name)
    .execute(&db.pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        info!("Created user {} before order", sender.user_id);
    }
    Ok(())
}

pub async fn visits_for_user(db: &Db, user_id: i64) -> Result<Vec<VisitRow>, Error> {
    sqlx::query_as::<_, VisitRow>(
        r#"SELECT date_id, user_id, title, description, due_date FROM "date"
           WHERE user_id = ? ORDER BY date_id"#,
    )
    .bind(user_id)
    .fetch_all(&db.pool)
    .await
}

/// Сохраняет заявку и возвращает сохранённую строку
pub async fn create_order(db: &Db, order: &NewOrder) -> Result<OrderRow, Error> {
    let order_id = sqlx::query(
        r#"INSERT INTO "orders" (user_id, phone, name, service_type, comment, created_date)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(order.user_id)
    .bind(&order.phone)
    .bind(&order.name)
    .bind(&order.service_type)
    .bind(&order.comment)
    .bind(now())
    .execute(&db.pool)
    .await?
    .last_insert_rowid();

    get_order(db, order_id)
        .await?
        .ok_or(Error::RowNotFound)
}

pub async fn get_order(db: &Db, order_id: i64) -> Result<Option<OrderRow>, Error> {
    sqlx::query_as::<_, OrderRow>(
        r#"SELECT order_id, user_id, phone, name, service_type, comment, created_date
           FROM "orders" WHERE order_id = ?"#,
    )
    .bind(order_id)
    .fetch_optional(&db.pool)
    .await
}

pub async fn orders_for_user(db: &Db, user_id: i64) -> Result<Vec<OrderRow>, Error> {
    sqlx::query_as::<_, OrderRow>(
        r#"SELECT order_id, user_id, phone, name, service_type, comment, created_date
           FROM "orders" WHERE user_id = ? ORDER BY order_id"#,
    )
    .bind(user_id)
    .fetch_all(&db.pool)
    .await
}
