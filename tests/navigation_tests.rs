mod common;

use common::{last_keyboard, texts, TestBot};
use yogita_bot::handlers::{labels, Command, State};

const MAIN_MENU: &str = "Выберите интересующий вас раздел ниже:";

#[tokio::test]
async fn start_greets_new_and_returning_users() {
    let bot = TestBot::new().await;

    let sent = bot.command(Command::Start).await;
    assert_eq!(sent[0].text, "Добро пожаловать, Анна!");
    assert!(sent[1].text.starts_with("Официальный помощник сайта yogita.ru"));
    assert_eq!(sent[2].text, MAIN_MENU);
    assert_eq!(
        last_keyboard(&sent),
        vec![
            "Общие программы",
            "Для беременных",
            "Коррекция веса",
            "Для детей",
            "Реабилитация",
            "Контакты и расписание",
            labels::ORDER,
        ]
    );

    let sent = bot.command(Command::Start).await;
    assert_eq!(sent[0].text, "Рад вас снова видеть, Анна!");
}

#[tokio::test]
async fn commands_reset_dialogue() {
    let bot = TestBot::new().await;
    bot.set_state(State::OrderName { program: None, phone: "89161234567".into() }).await;

    let sent = bot.command(Command::Menu).await;
    assert_eq!(texts(&sent), vec![MAIN_MENU]);
    assert_eq!(bot.state().await, State::Idle);
}

#[tokio::test]
async fn help_lists_commands() {
    let bot = TestBot::new().await;
    let sent = bot.text(labels::HELP).await;
    assert!(sent[0].text.contains("/order"));
    assert!(sent[0].text.contains("Записаться на занятие"));
}

#[tokio::test]
async fn general_programs_to_program_card_and_back() {
    let bot = TestBot::new().await;

    let sent = bot.text("Общие программы").await;
    assert_eq!(sent[0].text, "Общие программы\n\nПилатес, йога, терапия");
    assert_eq!(
        last_keyboard(&sent),
        vec!["Персональные занятия", "Групповые занятия", "Занятия с ТОП-Мастером", labels::BACK_TO_MENU]
    );
    assert_eq!(bot.state().await, State::SubmenuSelection);

    let sent = bot.text("Групповые занятия").await;
    assert_eq!(
        last_keyboard(&sent),
        vec!["Обычные (60 минут)", "Длительные (90-120 минут)", labels::BACK]
    );

    let sent = bot.text("Длительные (90-120 минут)").await;
    assert_eq!(sent[1].text, "Выберите программу (90-120 минут):");
    assert_eq!(last_keyboard(&sent), vec!["Интенсив для стройности", labels::BACK]);
    assert_eq!(bot.state().await, State::ProgramSelection);

    let sent = bot.text("Интенсив для стройности").await;
    assert_eq!(
        sent[0].text,
        "Интенсив для стройности\n\nДинамичная практика\n\nДлительность: 90 мин\nСтоимость: 1500 ₽"
    );
    assert_eq!(
        last_keyboard(&sent),
        vec!["Записаться на \"Интенсив для стройности\"", labels::BACK]
    );

    // Из программ "Назад" ведёт в общие программы
    let sent = bot.text(labels::BACK).await;
    assert_eq!(sent[1].text, "Выберите формат занятий:");

    // Из подменю "Назад" ведёт в главное меню
    let sent = bot.text(labels::BACK).await;
    assert_eq!(texts(&sent), vec![MAIN_MENU]);
    assert_eq!(bot.state().await, State::Idle);
}

#[tokio::test]
async fn standard_duration_filters_group_programs() {
    let bot = TestBot::new().await;
    let sent = bot.text("Обычные (60 минут)").await;
    assert_eq!(last_keyboard(&sent), vec!["Утренняя хатха", labels::BACK]);
}

#[tokio::test]
async fn section_lists_programs_linked_by_multiple_menu_ids() {
    let bot = TestBot::new().await;
    let sent = bot.text("Для беременных").await;
    assert_eq!(sent[0].text, "Для беременных\n\nМягкая практика для будущих мам");
    assert_eq!(
        last_keyboard(&sent),
        vec!["Персональная хатха", "Йога для беременных", labels::BACK_TO_MENU]
    );
}

#[tokio::test]
async fn section_without_programs_offers_sign_up() {
    let bot = TestBot::new().await;

    // Частичное совпадение с единственным пунктом меню
    let sent = bot.text("Реабил").await;
    assert_eq!(sent[0].text, "Реабилитация\n\nВосстановление после травм");
    assert_eq!(
        last_keyboard(&sent),
        vec!["Записаться на \"Реабилитация\"", labels::BACK_TO_MENU]
    );
    assert_eq!(bot.state().await, State::ProgramSelection);
}

#[tokio::test]
async fn single_partial_program_match_opens_card() {
    let bot = TestBot::new().await;
    let sent = bot.text("Интенсив").await;
    assert!(sent[0].text.starts_with("Интенсив для стройности\n\n"));
}

#[tokio::test]
async fn ambiguous_or_unknown_text_falls_back_to_main_menu() {
    let bot = TestBot::new().await;

    // "хатха" есть в двух программах
    let sent = bot.text("хатха").await;
    assert_eq!(texts(&sent), vec!["Пожалуйста, выберите пункт из меню ниже:", MAIN_MENU]);

    let sent = bot.text("абракадабра").await;
    assert_eq!(texts(&sent), vec!["Пожалуйста, выберите пункт из меню ниже:", MAIN_MENU]);
}

#[tokio::test]
async fn unknown_command_is_reported() {
    let bot = TestBot::new().await;
    let sent = bot.text("/schedule").await;
    assert_eq!(texts(&sent), vec!["Такой команды нет. Введите /help для списка команд."]);
}

#[tokio::test]
async fn faq_questions_and_answers() {
    let bot = TestBot::new().await;

    let sent = bot.text("Контакты и расписание").await;
    assert_eq!(sent[0].text, "Выберите информационный раздел:");
    assert_eq!(last_keyboard(&sent).last().map(String::as_str), Some(labels::BACK_TO_MENU));

    let sent = bot.text("FAQ").await;
    assert_eq!(
        last_keyboard(&sent),
        vec!["Что взять с собой?", "Можно ли новичкам?", labels::BACK]
    );
    assert_eq!(bot.state().await, State::SubmenuSelection);

    let sent = bot.text("Можно ли новичкам?").await;
    assert_eq!(
        sent[0].text,
        "ВОПРОС: Можно ли новичкам?\n\nОТВЕТ: Да, есть группы для начинающих\n\n"
    );
    assert_eq!(last_keyboard(&sent), vec![labels::BACK_TO_FAQ, labels::ORDER]);

    let sent = bot.text(labels::BACK_TO_FAQ).await;
    assert!(sent[0].text.starts_with("Часто задаваемые вопросы:"));
}

#[tokio::test]
async fn info_sections() {
    let bot = TestBot::new().await;

    let sent = bot.text("О компании").await;
    assert_eq!(texts(&sent), vec!["О компании\n\nСтудия йоги Yogita"]);

    let sent = bot.text("Мероприятия").await;
    assert_eq!(texts(&sent), vec!["На данный момент мероприятий нет."]);

    let sent = bot.text("Контакты").await;
    assert!(sent[0].text.starts_with("Контакты\n\nТелефон\n+7 (999) 000-00-00\n\n"));

    let sent = bot.text("Стоимость").await;
    assert_eq!(
        sent[0].text,
        "Стоимость занятий\n\nАбонементы\nДействуют 30 дней\n- 8 занятий: 8000 ₽\n  (60 мин)\n- Разовое: 1200 ₽\n\n"
    );
}

#[tokio::test]
async fn all_programs_grouped_by_format() {
    let bot = TestBot::new().await;
    let sent = bot.text("Все программы").await;
    let text = &sent[0].text;

    assert!(text.starts_with("Все программы студии\n\nПерсональные занятия:\n• Персональная хатха\n"));
    assert!(text.contains("• Утренняя хатха - 60 мин - 1200 ₽\n"));
    assert!(text.contains("Занятия с ТОП-Мастером:\n• Мастер-класс по аштанге\n"));
    assert!(text.contains("• Классический массаж\n  Расслабляющий массаж\n"));
    assert!(!text.contains("всего тела"));
    assert_eq!(last_keyboard(&sent), vec![labels::ORDER, labels::BACK_TO_MENU]);
}

#[tokio::test]
async fn location_sends_links_and_map() {
    let bot = TestBot::new().await;
    let sent = bot.text("Схема проезда").await;

    assert!(sent[0].text.contains("Адрес: Москва, ул. Исаковского, 33"));
    assert!(sent[0].text.contains("https://yandex.ru/maps/?text=%D0%9C"));
    assert!(sent[0].text.contains("Как добраться:"));
    let photo = sent[1].photo_url.as_deref().unwrap();
    assert!(photo.contains("ll=37.4,55.8"));
    assert_eq!(sent[1].text, "Расположение студии Yogita");
}

#[tokio::test]
async fn location_falls_back_when_photo_fails() {
    let mut bot = TestBot::new().await;
    bot.messenger.fail_photos = true;
    sqlx::query("DELETE FROM contacts WHERE contacts_title = 'Координаты'")
        .execute(&bot.db.pool)
        .await
        .unwrap();

    let sent = bot.text("Схема проезда").await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].text, "Для построения маршрута используйте ссылки выше");
}

#[tokio::test]
async fn non_text_outside_order_is_ignored() {
    let bot = TestBot::new().await;
    let sent = bot.sticker().await;
    assert!(sent.is_empty());
    assert_eq!(bot.state().await, State::Idle);
}

#[tokio::test]
async fn first_start_on_empty_dialogue_storage() {
    let bot = TestBot::new().await;

    let sent = bot.command(Command::Start).await;
    assert_eq!(sent[0].text, "Добро пожаловать, Анна!");
    assert_eq!(bot.state().await, State::Idle);

    let visits = yogita_bot::storage::leads::visits_for_user(&bot.db, common::USER_CHAT.0)
        .await
        .unwrap();
    assert_eq!(visits.len(), 1);
}

#[tokio::test]
async fn storage_error_returns_user_to_main_menu() {
    let bot = TestBot::new().await;
    bot.set_state(State::ProgramSelection).await;
    sqlx::query("DROP TABLE programs").execute(&bot.db.pool).await.unwrap();

    let sent = bot.text("что-нибудь").await;
    assert_eq!(
        texts(&sent),
        vec!["Ошибка при обработке запроса. Попробуйте позже.", MAIN_MENU]
    );
    assert_eq!(bot.state().await, State::Idle);
}

#[tokio::test]
async fn long_section_is_sent_in_several_messages() {
    let bot = TestBot::new().await;
    let description = "Практика и философия йоги. ".repeat(40);
    for id in 1..=6 {
        sqlx::query(
            "INSERT INTO mentors (mentor_id, menu_id, mentor_title, mentor_description) VALUES (?, 8, ?, ?)",
        )
        .bind(id)
        .bind(format!("Наставник {id}"))
        .bind(&description)
        .execute(&bot.db.pool)
        .await
        .unwrap();
    }

    let sent = bot.text("Наставники").await;
    assert!(sent.len() > 1);
    assert!(sent.iter().all(|s| s.text.encode_utf16().count() <= 4096));
    assert!(sent[0].text.starts_with("Наставники\n\nНаставник 1\n"));
    let joined: String = sent.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(joined.matches("Наставник ").count(), 6);
}
