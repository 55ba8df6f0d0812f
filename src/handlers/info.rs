// src/handlers/info.rs

//! Информационные разделы: тексты из меню, таблицы контента, схема проезда, FAQ.

use super::navigation::{create_keyboard, Back};
use super::{labels, Ctx, State};
use crate::catalog;
use crate::messenger::{Button, Keyboard, Messenger, ReplyKeyboard};
use crate::storage::{
    content, Contact, Event, Faq, MenuItem, Mentor, Price, PriceDetail, Program, Retreat, Review,
};
use crate::utils::parse_coordinates;
use anyhow::Result;
use tracing::{debug, error, info, warn};

/// Координаты студии, если в контактах их нет
pub const DEFAULT_COORDINATES: (f64, f64) = (55.831903, 37.330881);

const DIRECTIONS: &str = "Как добраться:\nОт метро 'Мякинино' 10 минут на автобусе\n\
     От метро 'Тушинская' 15 минут на маршрутке\nЕсть парковка";

/// Строка таблицы контента, выводимая в чат поле за полем
pub trait InfoEntry {
    fn fields(&self) -> Vec<&str>;
}

impl InfoEntry for Event {
    fn fields(&self) -> Vec<&str> {
        vec![&self.event_title, &self.event_description, &self.event_duration, &self.event_price]
    }
}

impl InfoEntry for Mentor {
    fn fields(&self) -> Vec<&str> {
        vec![&self.mentor_title, &self.mentor_description]
    }
}

impl InfoEntry for Retreat {
    fn fields(&self) -> Vec<&str> {
        vec![&self.retreat_title, &self.retreat_description]
    }
}

impl InfoEntry for Review {
    fn fields(&self) -> Vec<&str> {
        vec![&self.img_link]
    }
}

impl InfoEntry for Contact {
    fn fields(&self) -> Vec<&str> {
        vec![&self.contacts_title, &self.contacts_description]
    }
}

/// Заголовок, затем каждая запись: непустые поля построчно, пустая строка между записями.
/// None, если записей нет.
pub fn format_info_tab<T: InfoEntry>(title: &str, rows: &[T]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut text = format!("{title}\n\n");
    for row in rows {
        for field in row.fields().into_iter().filter(|f| !f.trim().is_empty()) {
            text.push_str(field);
            text.push('\n');
        }
        text.push('\n');
    }
    Some(text)
}

async fn display_info_tab<M: Messenger, T: InfoEntry>(
    ctx: &Ctx<'_, M>,
    title: &str,
    rows: Result<Vec<T>, sqlx::Error>,
    empty_message: &str,
    error_text: &str,
) -> Result<()> {
    match rows {
        Ok(rows) => {
            debug!("Section '{}': {} rows", title, rows.len());
            match format_info_tab(title, &rows) {
                Some(text) => ctx.say(text).await,
                None => ctx.say(empty_message).await,
            }
        }
        Err(e) => ctx.report(&format!("Loading section '{}'", title), e, error_text).await,
    }
}

/// Контент пункта из подменю "Контакты и расписание"
pub async fn display_info_content<M: Messenger>(ctx: &Ctx<'_, M>, item: &MenuItem) -> Result<()> {
    match item.menu_id {
        catalog::EVENTS => {
            display_info_tab(
                ctx,
                "Мероприятия",
                content::events(ctx.db).await,
                "На данный момент мероприятий нет.",
                "Ошибка при загрузке информации о мероприятиях",
            )
            .await
        }
        catalog::MENTORS => {
            display_info_tab(
                ctx,
                "Наставники",
                content::mentors(ctx.db).await,
                "Информация о наставниках недоступна",
                "Ошибка загрузки информации о наставниках",
            )
            .await
        }
        catalog::RETREATS => {
            display_info_tab(
                ctx,
                "Ретриты",
                content::retreats(ctx.db).await,
                "Сейчас ретритов нет",
                "Ошибка при загрузке информации о ретритах",
            )
            .await
        }
        catalog::REVIEWS => {
            display_info_tab(
                ctx,
                "Отзывы",
                content::reviews(ctx.db).await,
                "Отзывы временно недоступны",
                "Ошибка при загрузке отзывов",
            )
            .await
        }
        catalog::CONTACTS => {
            display_info_tab(
                ctx,
                "Контакты",
                content::contacts(ctx.db).await,
                "Контакты недоступны",
                "Ошибка при загрузке контактов",
            )
            .await
        }
        catalog::LOCATION => display_location(ctx, item).await,
        catalog::ALL_PROGRAMS => display_all_programs(ctx).await,
        catalog::FAQ => display_faq_menu(ctx).await,
        // О компании, услуги, расписание и всё прочее: заголовок и описание
        _ => ctx.say(format!("{}\n\n{}", item.menu_title, item.menu_description)).await,
    }
}

/// Стоимость занятий
pub fn format_pricing(list: &[(Price, Vec<PriceDetail>)]) -> String {
    if list.is_empty() {
        return "Информация о стоимости временно недоступна".to_string();
    }
    let mut text = String::from("Стоимость занятий\n\n");
    for (price, details) in list {
        text.push_str(&format!("{}\n", price.price_title));
        if !price.price_description.trim().is_empty() {
            text.push_str(&format!("{}\n", price.price_description));
        }
        for detail in details {
            text.push_str(&format!("- {}: {}\n", detail.price_detail_title, detail.price_detail_price));
            if !detail.price_detail_duration.trim().is_empty() {
                text.push_str(&format!("  ({})\n", detail.price_detail_duration));
            }
        }
        text.push('\n');
    }
    text
}

pub async fn display_pricing<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    match content::price_list(ctx.db).await {
        Ok(list) => ctx.say(format_pricing(&list)).await,
        Err(e) => ctx.report("Loading pricing", e, "Ошибка при загрузке стоимости").await,
    }
}

/// Ссылка на Яндекс.Карты и статичная карта по координатам
pub fn map_links(address: &str, (lat, lon): (f64, f64)) -> (String, String) {
    let search = format!("https://yandex.ru/maps/?text={}", urlencoding::encode(address));
    let static_map = format!(
        "https://static-maps.yandex.ru/1.x/?ll={lon},{lat}&size=450,450&z=16&l=map&pt={lon},{lat},pm2rdm"
    );
    (search, static_map)
}

/// Схема проезда: адрес и координаты из контактов студии
pub async fn display_location<M: Messenger>(ctx: &Ctx<'_, M>, item: &MenuItem) -> Result<()> {
    let contacts = match content::contacts_for_menu(ctx.db, catalog::CONTACTS).await {
        Ok(c) => c,
        Err(e) => return ctx.report("Loading location", e, "Ошибка загрузки схемы проезда").await,
    };

    let find = |title: &str| {
        contacts
            .iter()
            .find(|c| c.contacts_title == title)
            .map(|c| c.contacts_description.as_str())
    };
    let address = find("Адрес").unwrap_or("не указан");
    let coordinates = parse_coordinates(find("Координаты")).unwrap_or_else(|| {
        warn!("Using default studio coordinates");
        DEFAULT_COORDINATES
    });

    let (maps_url, static_map_url) = map_links(address, coordinates);
    let text = format!(
        "{}\n\nАдрес: {}\n\nНавигация:\nЯндекс.Карты: {}\n{}",
        item.menu_title, address, maps_url, DIRECTIONS
    );
    ctx.say(text).await?;

    if let Err(e) = ctx
        .messenger
        .send_photo(ctx.chat_id(), &static_map_url, "Расположение студии Yogita")
        .await
    {
        error!("Failed to send map photo to chat {}: {:#}", ctx.chat_id(), e);
        ctx.say("Для построения маршрута используйте ссылки выше").await?;
    }
    Ok(())
}

/// Список вопросов FAQ
pub async fn display_faq_menu<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    let faqs = match content::faqs(ctx.db).await {
        Ok(f) => f,
        Err(e) => return ctx.report("Loading FAQ", e, "Ошибка при загрузке FAQ").await,
    };
    if faqs.is_empty() {
        return ctx.say("FAQ временно недоступны").await;
    }

    let mut buttons: Vec<Button> = faqs.into_iter().map(|f| Button::text(f.question)).collect();
    buttons.push(Button::text(labels::BACK));

    ctx.reply(
        "Часто задаваемые вопросы:\nВыберите вопрос для просмотра ответа:",
        Keyboard::Reply(ReplyKeyboard::grid(buttons, 1)),
    )
    .await?;
    ctx.set_state(State::SubmenuSelection).await
}

/// Ответ на вопрос FAQ
pub async fn display_faq_answer<M: Messenger>(ctx: &Ctx<'_, M>, faq: &Faq) -> Result<()> {
    let text = format!("ВОПРОС: {}\n\nОТВЕТ: {}\n\n", faq.question, faq.answer);
    let keyboard = Keyboard::Reply(ReplyKeyboard::grid(
        vec![Button::text(labels::BACK_TO_FAQ), Button::text(labels::ORDER)],
        2,
    ));
    ctx.reply(text, keyboard).await
}

/// Все программы студии, сгруппированные по форматам
pub fn format_all_programs(
    personal: &[Program],
    group: &[Program],
    top: &[Program],
    massage: &[Program],
) -> String {
    let header = "Все программы студии\n\n";
    let mut text = String::from(header);

    if !personal.is_empty() {
        text.push_str("Персональные занятия:\n");
        for p in personal {
            text.push_str(&format!("• {}\n", p.program_title));
        }
        text.push('\n');
    }

    if !group.is_empty() {
        text.push_str("Групповые занятия:\n");
        for p in group {
            text.push_str(&format!("• {}", p.program_title));
            if !p.program_duration.is_empty() {
                text.push_str(&format!(" - {}", p.program_duration));
            }
            if !p.program_price.is_empty() {
                text.push_str(&format!(" - {}", p.program_price));
            }
            text.push('\n');
        }
        text.push('\n');
    }

    if !top.is_empty() {
        text.push_str("Занятия с ТОП-Мастером:\n");
        for p in top {
            text.push_str(&format!("• {}\n", p.program_title));
        }
        text.push('\n');
    }

    if !massage.is_empty() {
        text.push_str("Массаж:\n");
        for p in massage {
            text.push_str(&format!("• {}\n", p.program_title));
            // Только первая строка описания
            if let Some(first_line) = p.program_description.lines().next().filter(|l| !l.is_empty()) {
                text.push_str(&format!("  {}\n", first_line));
            }
        }
        text.push('\n');
    }

    if text == header {
        text.push_str("На данный момент программы отсутствуют.");
    }
    text
}

pub async fn display_all_programs<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    let loaded = async {
        Ok::<_, sqlx::Error>((
            content::programs_by_menu(ctx.db, catalog::PERSONAL).await?,
            content::programs_by_menu(ctx.db, catalog::GROUP).await?,
            content::programs_by_menu(ctx.db, catalog::TOP_MASTER).await?,
            content::programs_by_menu(ctx.db, catalog::SERVICES).await?,
        ))
    }
    .await;

    match loaded {
        Ok((personal, group, top, massage)) => {
            let text = format_all_programs(&personal, &group, &top, &massage);
            ctx.reply(
                text,
                create_keyboard(vec![labels::ORDER.to_string()], Back::Label(labels::BACK_TO_MENU)),
            )
            .await?;
            info!("All programs sent to chat {}", ctx.chat_id());
            Ok(())
        }
        Err(e) => ctx.report("Loading all programs", e, "Ошибка при загрузке списка программ").await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_listing() {
        assert_eq!(
            format_all_programs(&[], &[], &[], &[]),
            "Все программы студии\n\nНа данный момент программы отсутствуют."
        );
    }

    #[test]
    fn info_tab_skips_blank_fields() {
        let mentors = vec![
            Mentor { mentor_id: 1, menu_id: 8, mentor_title: "Ирина".into(), mentor_description: " ".into() },
            Mentor { mentor_id: 2, menu_id: 8, mentor_title: "Олег".into(), mentor_description: "Аштанга".into() },
        ];
        assert_eq!(
            format_info_tab("Наставники", &mentors).as_deref(),
            Some("Наставники\n\nИрина\n\nОлег\nАштанга\n\n")
        );
        assert_eq!(format_info_tab::<Mentor>("Наставники", &[]), None);
    }

    #[test]
    fn static_map_uses_lon_lat_order() {
        let (search, map) = map_links("ул. Мира 1", (55.5, 37.25));
        assert_eq!(search, "https://yandex.ru/maps/?text=%D1%83%D0%BB.%20%D0%9C%D0%B8%D1%80%D0%B0%201");
        assert!(map.contains("ll=37.25,55.5&"));
        assert!(map.ends_with("pt=37.25,55.5,pm2rdm"));
    }
}
