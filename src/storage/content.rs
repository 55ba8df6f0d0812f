// src/storage/content.rs

//! Чтение контента студии (меню, программы, инфо-разделы). Только SELECT.

use super::db::Db;
use super::schema::{
    Contact, Event, Faq, MenuItem, Mentor, Price, PriceDetail, Program, Retreat, Review,
};
use crate::catalog::linked_menu_ids;
use crate::utils::escape_like;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

/// Пункты меню из списка id, по возрастанию id
pub async fn menu_items_by_ids(db: &Db, ids: &[i64]) -> Result<Vec<MenuItem>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT menu_id, menu_title, menu_description FROM menu WHERE menu_id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY menu_id");

    qb.build_query_as::<MenuItem>().fetch_all(&db.pool).await
}

pub async fn menu_item(db: &Db, menu_id: i64) -> Result<Option<MenuItem>, sqlx::Error> {
    sqlx::query_as::<_, MenuItem>(
        "SELECT menu_id, menu_title, menu_description FROM menu WHERE menu_id = ?",
    )
    .bind(menu_id)
    .fetch_optional(&db.pool)
    .await
}

pub async fn menu_item_by_title(db: &Db, title: &str) -> Result<Option<MenuItem>, sqlx::Error> {
    sqlx::query_as::<_, MenuItem>(
        "SELECT menu_id, menu_title, menu_description FROM menu WHERE menu_title = ? ORDER BY menu_id LIMIT 1",
    )
    .bind(title)
    .fetch_optional(&db.pool)
    .await
}

/// Пункты меню, в заголовке которых встречается `fragment`
pub async fn menu_items_title_containing(db: &Db, fragment: &str) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as::<_, MenuItem>(
        r#"SELECT menu_id, menu_title, menu_description FROM menu
           WHERE menu_title LIKE '%' || ? || '%' ESCAPE '\'
           ORDER BY menu_id"#,
    )
    .bind(escape_like(fragment))
    .fetch_all(&db.pool)
    .await
}

const PROGRAM_COLUMNS: &str = "program_id, multiple_menu_ids, menu_id, program_title, \
     program_description, program_duration, program_price";

pub async fn program_by_title(db: &Db, title: &str) -> Result<Option<Program>, sqlx::Error> {
    sqlx::query_as::<_, Program>(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM programs WHERE program_title = ? ORDER BY program_id LIMIT 1"
    ))
    .bind(title)
    .fetch_optional(&db.pool)
    .await
}

pub async fn programs_title_containing(db: &Db, fragment: &str) -> Result<Vec<Program>, sqlx::Error> {
    sqlx::query_as::<_, Program>(&format!(
        r#"SELECT {PROGRAM_COLUMNS} FROM programs
           WHERE program_title LIKE '%' || ? || '%' ESCAPE '\'
           ORDER BY program_id"#
    ))
    .bind(escape_like(fragment))
    .fetch_all(&db.pool)
    .await
}

/// Программы, привязанные к пункту меню через menu_id
pub async fn programs_by_menu(db: &Db, menu_id: i64) -> Result<Vec<Program>, sqlx::Error> {
    sqlx::query_as::<_, Program>(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM programs WHERE menu_id = ? ORDER BY program_id"
    ))
    .bind(menu_id)
    .fetch_all(&db.pool)
    .await
}

/// Программы раздела: прямая привязка menu_id или упоминание в multiple_menu_ids
pub async fn programs_linked_to(db: &Db, menu_id: i64) -> Result<Vec<Program>, sqlx::Error> {
    let all = sqlx::query_as::<_, Program>(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM programs ORDER BY program_id"
    ))
    .fetch_all(&db.pool)
    .await?;

    let found: Vec<Program> = all
        .into_iter()
        .filter(|p| {
            p.menu_id == menu_id
                || linked_menu_ids(p.multiple_menu_ids.as_deref()).contains(&menu_id)
        })
        .collect();

    debug!("Programs linked to menu {}: {}", menu_id, found.len());
    Ok(found)
}

/// Прайс целиком: группы цен с деталями
pub async fn price_list(db: &Db) -> Result<Vec<(Price, Vec<PriceDetail>)>, sqlx::Error> {
    let prices = sqlx::query_as::<_, Price>(
        "SELECT price_id, menu_id, price_title, price_description FROM price ORDER BY price_id",
    )
    .fetch_all(&db.pool)
    .await?;

    let mut list = Vec::with_capacity(prices.len());
    for price in prices {
        let details = sqlx::query_as::<_, PriceDetail>(
            r#"SELECT price_detail_id, price_id, price_detail_title, price_detail_description,
                      price_detail_duration, price_detail_price
               FROM pricedetail WHERE price_id = ? ORDER BY price_detail_id"#,
        )
        .bind(price.price_id)
        .fetch_all(&db.pool)
        .await?;
        list.push((price, details));
    }
    Ok(list)
}

pub async fn contacts(db: &Db) -> Result<Vec<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "SELECT contacts_id, menu_id, contacts_title, contacts_description FROM contacts ORDER BY contacts_id",
    )
    .fetch_all(&db.pool)
    .await
}

pub async fn contacts_for_menu(db: &Db, menu_id: i64) -> Result<Vec<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        r#"SELECT contacts_id, menu_id, contacts_title, contacts_description
           FROM contacts WHERE menu_id = ? ORDER BY contacts_id"#,
    )
    .bind(menu_id)
    .fetch_all(&db.pool)
    .await
}

pub async fn events(db: &Db) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"SELECT event_id, menu_id, event_title, event_description, event_duration, event_price
           FROM events ORDER BY event_id"#,
    )
    .fetch_all(&db.pool)
    .await
}

pub async fn mentors(db: &Db) -> Result<Vec<Mentor>, sqlx::Error> {
    sqlx::query_as::<_, Mentor>(
        "SELECT mentor_id, menu_id, mentor_title, mentor_description FROM mentors ORDER BY mentor_id",
    )
    .fetch_all(&db.pool)
    .await
}

pub async fn retreats(db: &Db) -> Result<Vec<Retreat>, sqlx::Error> {
    sqlx::query_as::<_, Retreat>(
        "SELECT retreat_id, menu_id, retreat_title, retreat_description FROM retreats ORDER BY retreat_id",
    )
    .fetch_all(&db.pool)
    .await
}

pub async fn reviews(db: &Db) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>("SELECT review_id, menu_id, img_link FROM reviews ORDER BY review_id")
        .fetch_all(&db.pool)
        .await
}

pub async fn faqs(db: &Db) -> Result<Vec<Faq>, sqlx::Error> {
    sqlx::query_as::<_, Faq>("SELECT faq_id, menu_id, question, answer FROM faq ORDER BY faq_id")
        .fetch_all(&db.pool)
        .await
}

pub async fn faq_by_question(db: &Db, question: &str) -> Result<Option<Faq>, sqlx::Error> {
    sqlx::query_as::<_, Faq>(
        "SELECT faq_id, menu_id, question, answer FROM faq WHERE question = ? ORDER BY faq_id LIMIT 1",
    )
    .bind(question)
    .fetch_optional(&db.pool)
    .await
}
