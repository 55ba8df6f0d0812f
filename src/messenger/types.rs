// src/messenger/types.rs

/// Кнопка reply-клавиатуры
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub request_contact: bool,
}

impl Button {
    pub fn text(label: impl Into<String>) -> Self {
        Self { label: label.into(), request_contact: false }
    }

    /// Кнопка "поделиться контактом"
    pub fn contact(label: impl Into<String>) -> Self {
        Self { label: label.into(), request_contact: true }
    }
}

/// Reply-клавиатура: строки кнопок
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<Button>>,
    pub one_time: bool,
}

impl ReplyKeyboard {
    /// Раскладывает кнопки по `row_width` в строке
    pub fn grid(buttons: Vec<Button>, row_width: usize) -> Self {
        let row_width = row_width.max(1);
        let rows = buttons
            .chunks(row_width)
            .map(|chunk| chunk.to_vec())
            .collect();
        Self { rows, one_time: false }
    }

    pub fn one_time(mut self) -> Self {
        self.one_time = true;
        self
    }

    /// Все подписи кнопок по порядку
    pub fn labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .map(|b| b.label.as_str())
            .collect()
    }
}

/// Что сделать с клавиатурой пользователя вместе с сообщением
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    #[default]
    Keep,
    Remove,
    Reply(ReplyKeyboard),
}

impl Keyboard {
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Keyboard::Reply(kb) => kb.labels(),
            _ => Vec::new(),
        }
    }
}
