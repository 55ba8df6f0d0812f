// src/handlers/navigation.rs

use super::{info, labels, order_flow, Ctx, State};
use crate::catalog::{self, DurationFilter};
use crate::messenger::{Button, Keyboard, Messenger, ReplyKeyboard};
use crate::storage::{content, Db, MenuItem, Program};
use anyhow::{anyhow, Result};
use tracing::{debug, info};

/// Кнопка возврата под списком
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    None,
    /// "Назад" для коротких списков (до 4 пунктов), иначе "Назад в меню"
    Auto,
    Label(&'static str),
}

/// Клавиатура в две колонки из подписей + кнопка возврата
pub fn create_keyboard(titles: Vec<String>, back: Back) -> Keyboard {
    let back_label = match back {
        Back::None => None,
        Back::Auto if titles.len() <= 4 => Some(labels::BACK),
        Back::Auto => Some(labels::BACK_TO_MENU),
        Back::Label(label) => Some(label),
    };

    let mut buttons: Vec<Button> = titles.into_iter().map(Button::text).collect();
    if let Some(label) = back_label {
        buttons.push(Button::text(label));
    }
    Keyboard::Reply(ReplyKeyboard::grid(buttons, 2))
}

/// Заголовок раздела и описание (если есть)
fn section_text(item: &MenuItem) -> String {
    let mut text = item.menu_title.clone();
    if !item.menu_description.trim().is_empty() {
        text.push_str("\n\n");
        text.push_str(&item.menu_description);
    }
    text
}

async fn required_menu_item(db: &Db, menu_id: i64) -> Result<MenuItem> {
    content::menu_item(db, menu_id)
        .await?
        .ok_or_else(|| anyhow!("menu item {} not found", menu_id))
}

/// Главное меню с основными разделами из базы
pub async fn show_main_menu<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    ctx.set_state(State::Idle).await?;

    match content::menu_items_by_ids(ctx.db, &catalog::MAIN_MENU_ITEMS).await {
        Ok(items) => {
            let mut titles: Vec<String> = items.into_iter().map(|i| i.menu_title).collect();
            titles.push(labels::ORDER.to_string());
            ctx.reply(
                "Выберите интересующий вас раздел ниже:",
                create_keyboard(titles, Back::None),
            )
            .await
        }
        Err(e) => {
            ctx.report("Loading main menu", e, "Ошибка при загрузке меню. Попробуйте позже")
                .await
        }
    }
}

/// "Назад": из программ в общие программы, иначе в главное меню
pub async fn back_navigation<M: Messenger>(ctx: &Ctx<'_, M>, state: &State) -> Result<()> {
    match state {
        State::ProgramSelection => show_general_programs_menu(ctx).await,
        _ => show_main_menu(ctx).await,
    }
}

/// Разбор свободного текста: служебные кнопки, запись на программу,
/// точное и частичное совпадение с программами и пунктами меню.
pub async fn handle_menu_selection<M: Messenger>(
    ctx: &Ctx<'_, M>,
    state: &State,
    choice: &str,
) -> Result<()> {
    match choice {
        labels::ORDER => return order_flow::start_order(ctx, None).await,
        labels::BACK_TO_MENU => return show_main_menu(ctx).await,
        labels::BACK => return back_navigation(ctx, state).await,
        labels::BACK_TO_FAQ => return info::display_faq_menu(ctx).await,
        _ => {}
    }

    if let Some(program_title) = labels::parse_program_order(choice) {
        return order_flow::start_order(ctx, Some(program_title)).await;
    }

    if let Some(program) = content::program_by_title(ctx.db, choice).await? {
        return show_program_details(ctx, &program).await;
    }

    if let Some(item) = content::menu_item_by_title(ctx.db, choice).await? {
        return handle_menu_navigation(ctx, &item).await;
    }

    // Частичное совпадение засчитывается, только если оно единственное
    let programs = content::programs_title_containing(ctx.db, choice).await?;
    if let [program] = programs.as_slice() {
        return show_program_details(ctx, program).await;
    }

    let items = content::menu_items_title_containing(ctx.db, choice).await?;
    if let [item] = items.as_slice() {
        return handle_menu_navigation(ctx, item).await;
    }

    debug!("No menu match for '{}' in chat {}", choice, ctx.chat_id());
    ctx.say("Пожалуйста, выберите пункт из меню ниже:").await?;
    show_main_menu(ctx).await
}

/// Переход в пункт меню по его id
pub async fn handle_menu_navigation<M: Messenger>(ctx: &Ctx<'_, M>, item: &MenuItem) -> Result<()> {
    let id = item.menu_id;
    match id {
        catalog::GENERAL => show_general_programs_menu(ctx).await,
        id if catalog::LINKED_PROGRAM_SECTIONS.contains(&id) => show_linked_programs(ctx, item).await,
        catalog::ALL_COMPANY => show_information_menu(ctx).await,
        catalog::PERSONAL => show_programs_by_type(ctx, catalog::PERSONAL, "Выберите программу:", None).await,
        catalog::GROUP => show_group_programs_format(ctx).await,
        catalog::TOP_MASTER => {
            show_programs_by_type(ctx, catalog::TOP_MASTER, "Выберите программу с ТОП-Мастером:", None)
                .await
        }
        id if catalog::DURATION_ITEMS.contains(&id) => {
            show_programs_by_type(ctx, catalog::GROUP, "Выберите программу:", DurationFilter::from_menu_id(id))
                .await
        }
        catalog::PRICING => info::display_pricing(ctx).await,
        id if catalog::INFO_ITEMS.contains(&id) => info::display_info_content(ctx, item).await,
        _ => show_section_card(ctx, item).await,
    }
}

/// Карточка раздела без программ: описание и кнопка общей записи на раздел
pub async fn show_section_card<M: Messenger>(ctx: &Ctx<'_, M>, item: &MenuItem) -> Result<()> {
    let keyboard = Keyboard::Reply(ReplyKeyboard::grid(
        vec![
            Button::text(labels::program_order(&item.menu_title)),
            Button::text(labels::BACK_TO_MENU),
        ],
        2,
    ));
    ctx.reply(section_text(item), keyboard).await?;
    ctx.set_state(State::ProgramSelection).await?;
    info!("Shown generic sign-up card for section '{}'", item.menu_title);
    Ok(())
}

/// Подменю "Общие программы": форматы занятий
pub async fn show_general_programs_menu<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    let loaded = async {
        let item = required_menu_item(ctx.db, catalog::GENERAL).await?;
        let formats = content::menu_items_by_ids(ctx.db, &catalog::FORMAT_ITEMS).await?;
        Ok::<_, anyhow::Error>((item, formats))
    }
    .await;

    match loaded {
        Ok((item, formats)) => {
            let titles = formats.into_iter().map(|i| i.menu_title).collect();
            ctx.say(format!("{}\n\n{}", item.menu_title, item.menu_description)).await?;
            ctx.reply(
                "Выберите формат занятий:",
                create_keyboard(titles, Back::Label(labels::BACK_TO_MENU)),
            )
            .await?;
            ctx.set_state(State::SubmenuSelection).await
        }
        Err(e) => {
            ctx.report("Loading general programs", e, "Ошибка при загрузке информации о программах")
                .await
        }
    }
}

/// Карточка программы с кнопкой записи
pub async fn show_program_details<M: Messenger>(ctx: &Ctx<'_, M>, program: &Program) -> Result<()> {
    ctx.reply(program_card(program), program_keyboard(program)).await?;
    ctx.set_state(State::ProgramSelection).await
}

pub fn program_card(program: &Program) -> String {
    let mut text = format!("{}\n\n{}", program.program_title, program.program_description);
    if !program.program_duration.trim().is_empty() {
        text.push_str(&format!("\n\nДлительность: {}", program.program_duration));
    }
    if !program.program_price.trim().is_empty() {
        text.push_str(&format!("\nСтоимость: {}", program.program_price));
    }
    text
}

fn program_keyboard(program: &Program) -> Keyboard {
    Keyboard::Reply(ReplyKeyboard::grid(
        vec![
            Button::text(labels::program_order(&program.program_title)),
            Button::text(labels::BACK),
        ],
        2,
    ))
}

/// Программы пункта меню (по menu_id), для групповых с фильтром по длительности
pub async fn show_programs_by_type<M: Messenger>(
    ctx: &Ctx<'_, M>,
    menu_id: i64,
    choice_text: &str,
    filter: Option<DurationFilter>,
) -> Result<()> {
    let loaded = async {
        let item = required_menu_item(ctx.db, menu_id).await?;
        let programs = content::programs_by_menu(ctx.db, menu_id).await?;
        Ok::<_, anyhow::Error>((item, programs))
    }
    .await;

    let (item, programs) = match loaded {
        Ok(v) => v,
        Err(e) => {
            return ctx
                .report(&format!("Loading programs for menu {}", menu_id), e, "Ошибка при загрузке программ")
                .await;
        }
    };

    let (titles, choice_text): (Vec<String>, &str) = match filter {
        Some(f) => (
            programs
                .into_iter()
                .filter(|p| f.matches(&p.program_duration))
                .map(|p| p.program_title)
                .collect(),
            f.prompt(),
        ),
        None => (programs.into_iter().map(|p| p.program_title).collect(), choice_text),
    };

    ctx.say(section_text(&item)).await?;
    ctx.reply(choice_text, create_keyboard(titles, Back::Label(labels::BACK))).await?;
    ctx.set_state(State::ProgramSelection).await
}

/// Подменю групповых занятий по длительности
pub async fn show_group_programs_format<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    let loaded = async {
        let item = required_menu_item(ctx.db, catalog::GROUP).await?;
        let durations = content::menu_items_by_ids(ctx.db, &catalog::DURATION_ITEMS).await?;
        Ok::<_, anyhow::Error>((item, durations))
    }
    .await;

    match loaded {
        Ok((item, durations)) => {
            let titles = durations.into_iter().map(|i| i.menu_title).collect();
            ctx.say(format!("{}\n\n{}", item.menu_title, item.menu_description)).await?;
            ctx.reply(
                "Выберите длительность занятий:",
                create_keyboard(titles, Back::Label(labels::BACK)),
            )
            .await?;
            ctx.set_state(State::SubmenuSelection).await
        }
        Err(e) => {
            ctx.report("Loading group formats", e, "Ошибка при загрузке форматов занятий")
                .await
        }
    }
}

/// Программы тематического раздела: по menu_id и по multiple_menu_ids
pub async fn show_linked_programs<M: Messenger>(ctx: &Ctx<'_, M>, item: &MenuItem) -> Result<()> {
    let programs = match content::programs_linked_to(ctx.db, item.menu_id).await {
        Ok(p) => p,
        Err(e) => {
            return ctx
                .report(&format!("Loading programs for '{}'", item.menu_title), e, "Ошибка при загрузке программ")
                .await;
        }
    };
    info!("Found {} programs for section '{}' (menu_id {})", programs.len(), item.menu_title, item.menu_id);

    if programs.is_empty() {
        return show_section_card(ctx, item).await;
    }

    let titles = programs.into_iter().map(|p| p.program_title).collect();
    ctx.say(section_text(item)).await?;
    ctx.reply(
        "Выберите программу:",
        create_keyboard(titles, Back::Label(labels::BACK_TO_MENU)),
    )
    .await?;
    ctx.set_state(State::ProgramSelection).await
}

/// Подменю "Контакты и расписание"
pub async fn show_information_menu<M: Messenger>(ctx: &Ctx<'_, M>) -> Result<()> {
    match content::menu_items_by_ids(ctx.db, &catalog::INFO_ITEMS).await {
        Ok(items) => {
            let titles = items.into_iter().map(|i| i.menu_title).collect();
            ctx.reply(
                "Выберите информационный раздел:",
                create_keyboard(titles, Back::Auto),
            )
            .await?;
            ctx.set_state(State::SubmenuSelection).await
        }
        Err(e) => ctx.report("Loading information menu", e, "Ошибка при загрузке меню").await,
    }
}
