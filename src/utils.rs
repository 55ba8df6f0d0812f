// src/utils.rs

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

/// Цифры, пробелы, скобки, плюс, дефис и точка
static PHONE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s()+.-]+$").expect("phone regex"));

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MIN_NAME_CHARS: usize = 2;

/// Ошибки проверки телефона. Текст ошибки показывается пользователю как есть.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Номер содержит недопустимые символы. Допустимы: цифры, пробелы, (), +, -, .")]
    InvalidCharacters,
    #[error("Номер должен быть не менее 10 цифр.")]
    TooShort,
    #[error("Номер должен начинаться с 7, 8 или +7")]
    WrongCountryCode,
}

/// Проверяет номер, введённый текстом. Возвращает номер без внешних пробелов.
pub fn validate_phone(input: &str) -> Result<String, PhoneError> {
    let phone = input.trim();
    if !PHONE_CHARS.is_match(phone) {
        return Err(PhoneError::InvalidCharacters);
    }

    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return Err(PhoneError::TooShort);
    }
    if digits.len() > MIN_PHONE_DIGITS && !digits.starts_with(['7', '8']) {
        return Err(PhoneError::WrongCountryCode);
    }

    Ok(phone.to_string())
}

/// Имя не короче двух символов (после trim)
pub fn validate_name(input: &str) -> Option<String> {
    let name = input.trim();
    (name.chars().count() >= MIN_NAME_CHARS).then(|| name.to_string())
}

/// Парсит координаты из строки вида "lat,lon"
pub fn parse_coordinates(raw: Option<&str>) -> Option<(f64, f64)> {
    let raw = raw?;
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts = cleaned.split(',');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Some((lat, lon)),
            _ => {
                warn!("Failed to parse coordinates '{}'", raw);
                None
            }
        },
        _ => None,
    }
}

/// Экранирует спецсимволы LIKE (используется вместе с ESCAPE '\')
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Предел длины одного текстового сообщения Telegram (в UTF-16 единицах)
pub const TELEGRAM_TEXT_LIMIT: usize = 4096;

fn flush_chunk(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    let chunk = std::mem::take(current);
    *current_len = 0;
    // Telegram не принимает сообщения из одних пробелов
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
}

/// Режет текст на части не длиннее `limit`, по возможности по границам строк
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.encode_utf16().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.encode_utf16().count();
        if current_len + line_len > limit {
            flush_chunk(&mut chunks, &mut current, &mut current_len);
        }
        if line_len <= limit {
            current.push_str(line);
            current_len += line_len;
            continue;
        }
        // Строка длиннее лимита режется посимвольно
        for c in line.chars() {
            if current_len + c.len_utf16() > limit {
                flush_chunk(&mut chunks, &mut current, &mut current_len);
            }
            current.push(c);
            current_len += c.len_utf16();
        }
    }
    flush_chunk(&mut chunks, &mut current, &mut current_len);
    chunks
}
