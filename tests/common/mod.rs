//! Общие помощники для интеграционных тестов: база в памяти с контентом,
//! диалоги в InMemStorage и мессенджер, который записывает исходящие сообщения.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use teloxide::dispatching::dialogue::{Dialogue, ErasedStorage, InMemStorage, Storage};
use teloxide::types::ChatId;
use yogita_bot::handlers::{self, BotDialogue, Command, Ctx, State};
use yogita_bot::messenger::{Keyboard, Messenger};
use yogita_bot::models::{Content, Incoming, Sender};
use yogita_bot::storage::Db;

pub const USER_CHAT: ChatId = ChatId(1001);
pub const ADMIN_CHAT: ChatId = ChatId(-500);

/// Одно исходящее сообщение
#[derive(Debug, Clone)]
pub struct Sent {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Keyboard,
    pub photo_url: Option<String>,
}

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    pub fail_photos: bool,
}

impl RecordingMessenger {
    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, chat_id: ChatId, text: String, keyboard: Keyboard) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(Sent { chat_id, text, keyboard, photo_url: None });
        Ok(())
    }

    async fn send_photo(&self, chat_id: ChatId, url: &str, caption: &str) -> anyhow::Result<()> {
        if self.fail_photos {
            anyhow::bail!("photo upload rejected");
        }
        self.sent.lock().unwrap().push(Sent {
            chat_id,
            text: caption.to_string(),
            keyboard: Keyboard::Keep,
            photo_url: Some(url.to_string()),
        });
        Ok(())
    }
}

/// Тестовый бот: один пользователь, одна база, одно хранилище диалогов
pub struct TestBot {
    pub db: Db,
    pub storage: Arc<ErasedStorage<State>>,
    pub messenger: RecordingMessenger,
    pub admin_chat_id: Option<ChatId>,
    pub sender: Sender,
}

impl TestBot {
    pub async fn new() -> Self {
        let db = Db::connect_in_memory().await.unwrap();
        seed_content(&db).await;
        Self {
            db,
            storage: InMemStorage::<State>::new().erase(),
            messenger: RecordingMessenger::default(),
            admin_chat_id: Some(ADMIN_CHAT),
            sender: Sender {
                user_id: USER_CHAT.0,
                username: Some("anna_yoga".into()),
                first_name: "Анна".into(),
                last_name: None,
            },
        }
    }

    pub fn dialogue(&self) -> BotDialogue {
        Dialogue::new(self.storage.clone(), USER_CHAT)
    }

    pub async fn state(&self) -> State {
        self.dialogue().get_or_default().await.unwrap()
    }

    pub async fn set_state(&self, state: State) {
        self.dialogue().update(state).await.unwrap();
    }

    async fn deliver(&self, content: Content, cmd: Option<Command>) -> Vec<Sent> {
        let dialogue = self.dialogue();
        let msg = Incoming { chat_id: USER_CHAT, sender: self.sender.clone(), content };
        let ctx = Ctx {
            messenger: &self.messenger,
            db: &self.db,
            dialogue: &dialogue,
            admin_chat_id: self.admin_chat_id,
            msg: &msg,
        };
        match cmd {
            Some(cmd) => handlers::handle_command(&ctx, cmd).await,
            None => handlers::handle_message(&ctx).await,
        }
        self.messenger.take()
    }

    pub async fn text(&self, text: &str) -> Vec<Sent> {
        self.deliver(Content::Text(text.to_string()), None).await
    }

    pub async fn contact(&self, phone: &str) -> Vec<Sent> {
        self.deliver(Content::Contact { phone: phone.to_string() }, None).await
    }

    pub async fn sticker(&self) -> Vec<Sent> {
        self.deliver(Content::Other, None).await
    }

    pub async fn command(&self, cmd: Command) -> Vec<Sent> {
        self.deliver(Content::Text(String::new()), Some(cmd)).await
    }
}

/// Сообщения в чат пользователя
pub fn to_user(sent: &[Sent]) -> Vec<&Sent> {
    sent.iter().filter(|s| s.chat_id == USER_CHAT).collect()
}

pub fn last_keyboard(sent: &[Sent]) -> Vec<String> {
    sent.iter()
        .rev()
        .find(|s| matches!(s.keyboard, Keyboard::Reply(_)))
        .map(|s| s.keyboard.labels().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn texts(sent: &[Sent]) -> Vec<&str> {
    sent.iter().map(|s| s.text.as_str()).collect()
}

const MENU: &[(i64, &str, &str)] = &[
    (1, "О компании", "Студия йоги Yogita"),
    (2, "Мероприятия", ""),
    (3, "Услуги", "Массаж и восстановление"),
    (4, "Персональные занятия", "Индивидуальная работа с наставником"),
    (5, "Групповые занятия", "Занятия в группах до 10 человек"),
    (6, "Расписание", "Пн-Пт 8:00-21:00"),
    (7, "Стоимость", ""),
    (8, "Наставники", ""),
    (9, "Ретриты", ""),
    (10, "Отзывы", ""),
    (11, "FAQ", ""),
    (12, "Контакты", ""),
    (13, "Схема проезда", ""),
    (14, "Общие программы", "Пилатес, йога, терапия"),
    (15, "Для беременных", "Мягкая практика для будущих мам"),
    (16, "Коррекция веса", "Программы для снижения веса"),
    (17, "Для детей", "Йога для детей от 5 лет"),
    (18, "Реабилитация", "Восстановление после травм"),
    (19, "Контакты и расписание", ""),
    (20, "Занятия с ТОП-Мастером", "Практика с ведущими мастерами"),
    (21, "Обычные (60 минут)", ""),
    (22, "Длительные (90-120 минут)", ""),
    (23, "Все программы", ""),
];

/// Контент студии, близкий к боевой базе
pub async fn seed_content(db: &Db) {
    for (id, title, description) in MENU {
        sqlx::query("INSERT INTO menu (menu_id, menu_title, menu_description) VALUES (?, ?, ?)")
            .bind(id)
            .bind(title)
            .bind(description)
            .execute(&db.pool)
            .await
            .unwrap();
    }

    let programs: &[(i64, Option<&str>, i64, &str, &str, &str, &str)] = &[
        (1, Some("15"), 4, "Персональная хатха", "Занятие один на один", "60 мин", "4000 ₽"),
        (2, None, 5, "Утренняя хатха", "Бодрое начало дня", "60 мин", "1200 ₽"),
        (3, Some("16"), 5, "Интенсив для стройности", "Динамичная практика", "90 мин", "1500 ₽"),
        (4, None, 20, "Мастер-класс по аштанге", "С ведущим мастером", "120 мин", "3000 ₽"),
        (5, None, 3, "Классический массаж", "Расслабляющий массаж\nвсего тела", "60 мин", "3500 ₽"),
        (6, None, 15, "Йога для беременных", "Безопасная практика", "60 мин", "1300 ₽"),
    ];
    for (id, multi, menu_id, title, description, duration, price) in programs {
        sqlx::query(
            r#"INSERT INTO programs (program_id, multiple_menu_ids, menu_id, program_title,
               program_description, program_duration, program_price) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(multi)
        .bind(menu_id)
        .bind(title)
        .bind(description)
        .bind(duration)
        .bind(price)
        .execute(&db.pool)
        .await
        .unwrap();
    }

    sqlx::query(
        "INSERT INTO contacts (contacts_id, menu_id, contacts_title, contacts_description) VALUES \
         (1, 12, 'Телефон', '+7 (999) 000-00-00'), \
         (2, 12, 'Адрес', 'Москва, ул. Исаковского, 33'), \
         (3, 12, 'Координаты', '55.80, 37.40')",
    )
    .execute(&db.pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO faq (faq_id, menu_id, question, answer) VALUES \
         (1, 11, 'Что взять с собой?', 'Удобную одежду, коврик выдадим'), \
         (2, 11, 'Можно ли новичкам?', 'Да, есть группы для начинающих')",
    )
    .execute(&db.pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO price (price_id, menu_id, price_title, price_description) VALUES \
         (1, 7, 'Абонементы', 'Действуют 30 дней')",
    )
    .execute(&db.pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO pricedetail (price_detail_id, price_id, price_detail_title, \
         price_detail_description, price_detail_duration, price_detail_price) VALUES \
         (1, 1, '8 занятий', '', '60 мин', '8000 ₽'), \
         (2, 1, 'Разовое', '', '', '1200 ₽')",
    )
    .execute(&db.pool)
    .await
    .unwrap();
}
