// src/storage/schema.rs

//! Схема базы данных SQLite. Имена таблиц и колонок совпадают с уже
//! наполненной базой контента студии.

use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePool;
use sqlx::{Error, FromRow};
use tracing::info;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "user" (
        user_id     INTEGER NOT NULL PRIMARY KEY,
        username    VARCHAR(255),
        first_name  VARCHAR(255) NOT NULL,
        last_name   VARCHAR(255)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "date" (
        date_id     INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL REFERENCES "user" (user_id),
        title       VARCHAR(255) NOT NULL,
        description VARCHAR(255) NOT NULL,
        due_date    DATETIME NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "orders" (
        order_id     INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL REFERENCES "user" (user_id),
        phone        VARCHAR(20) NOT NULL,
        name         VARCHAR(100) NOT NULL,
        service_type VARCHAR(100),
        comment      TEXT,
        created_date DATETIME NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "menu" (
        menu_id          INTEGER NOT NULL PRIMARY KEY,
        menu_title       VARCHAR(50) NOT NULL,
        menu_description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "programs" (
        program_id          INTEGER NOT NULL PRIMARY KEY,
        multiple_menu_ids   VARCHAR(50),
        menu_id             INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        program_title       VARCHAR(200) NOT NULL,
        program_description TEXT NOT NULL,
        program_duration    VARCHAR(100) NOT NULL,
        program_price       VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "price" (
        price_id          INTEGER NOT NULL PRIMARY KEY,
        menu_id           INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        price_title       VARCHAR(100) NOT NULL,
        price_description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "pricedetail" (
        price_detail_id          INTEGER NOT NULL PRIMARY KEY,
        price_id                 INTEGER NOT NULL REFERENCES "price" (price_id) ON DELETE CASCADE,
        price_detail_title       VARCHAR(100) NOT NULL,
        price_detail_description TEXT NOT NULL,
        price_detail_duration    VARCHAR(50) NOT NULL,
        price_detail_price       VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "contacts" (
        contacts_id          INTEGER NOT NULL PRIMARY KEY,
        menu_id              INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        contacts_title       VARCHAR(20) NOT NULL,
        contacts_description VARCHAR(200) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "events" (
        event_id          INTEGER NOT NULL PRIMARY KEY,
        menu_id           INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        event_title       VARCHAR(200) NOT NULL,
        event_description TEXT NOT NULL,
        event_duration    VARCHAR(100) NOT NULL,
        event_price       VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "mentors" (
        mentor_id          INTEGER NOT NULL PRIMARY KEY,
        menu_id            INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        mentor_title       VARCHAR(100) NOT NULL,
        mentor_description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "retreats" (
        retreat_id          INTEGER NOT NULL PRIMARY KEY,
        menu_id             INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        retreat_title       VARCHAR(100) NOT NULL,
        retreat_description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "reviews" (
        review_id INTEGER NOT NULL PRIMARY KEY,
        menu_id   INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        img_link  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "faq" (
        faq_id   INTEGER NOT NULL PRIMARY KEY,
        menu_id  INTEGER NOT NULL REFERENCES "menu" (menu_id) ON DELETE CASCADE,
        question TEXT NOT NULL,
        answer   TEXT NOT NULL
    )
    "#,
];

/// Создаёт таблицы, если их нет. Данными не наполняет.
pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), Error> {
    info!("Applying database migrations...");
    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    info!("Database tables checked/created ({}).", TABLES.len());
    Ok(())
}

#[derive(Debug, FromRow, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

#[derive(Debug, FromRow, Clone)]
pub struct VisitRow {
    pub date_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDateTime,
}

#[derive(Debug, FromRow, Clone)]
pub struct OrderRow {
    pub order_id: i64,
    pub user_id: i64,
    pub phone: String,
    pub name: String,
    pub service_type: Option<String>,
    pub comment: Option<String>,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, FromRow, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub menu_id: i64,
    pub menu_title: String,
    pub menu_description: String,
}

#[derive(Debug, FromRow, Clone, PartialEq, Eq)]
pub struct Program {
    pub program_id: i64,
    pub multiple_menu_ids: Option<String>,
    pub menu_id: i64,
    pub program_title: String,
    pub program_description: String,
    pub program_duration: String,
    pub program_price: String,
}

#[derive(Debug, FromRow, Clone)]
pub struct Price {
    pub price_id: i64,
    pub menu_id: i64,
    pub price_title: String,
    pub price_description: String,
}

#[derive(Debug, FromRow, Clone)]
pub struct PriceDetail {
    pub price_detail_id: i64,
    pub price_id: i64,
    pub price_detail_title: String,
    pub price_detail_description: String,
    pub price_detail_duration: String,
    pub price_detail_price: String,
}

#[derive(Debug, FromRow, Clone)]
pub struct Contact {
    pub contacts_id: i64,
    pub menu_id: i64,
    pub contacts_title: String,
    pub contacts_description: String,
}

#[derive(Debug, FromRow, Clone)]
pub struct Event {
    pub event_id: i64,
    pub menu_id: i64,
    pub event_title: String,
    pub event_description: String,
    pub event_duration: String,
    pub event_price: String,
}

#[derive(Debug, FromRow, Clone)]
pub struct Mentor {
    pub mentor_id: i64,
    pub menu_id: i64,
    pub mentor_title: String,
    pub mentor_description: String,
}

#[derive(Debug, FromRow, Clone)]
pub struct Retreat {
    pub retreat_id: i64,
    pub menu_id: i64,
    pub retreat_title: String,
    pub retreat_description: String,
}

#[derive(Debug, FromRow, Clone)]
pub struct Review {
    pub review_id: i64,
    pub menu_id: i64,
    pub img_link: String,
}

#[derive(Debug, FromRow, Clone, PartialEq, Eq)]
pub struct Faq {
    pub faq_id: i64,
    pub menu_id: i64,
    pub question: String,
    pub answer: String,
}
