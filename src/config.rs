// src/config.rs
use serde::Deserialize;
use std::env;
use anyhow::Result;
use config::{Config as Loader, Environment, File};

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    #[serde(default)]
    pub admin_chat_id: Option<i64>, // Куда пересылать заявки

    // SQLite
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,

    #[serde(default = "default_db_init_attempts")]
    pub db_init_attempts: u32,

    #[serde(default = "default_db_init_retry_delay_secs")]
    pub db_init_retry_delay_secs: u64,

    // Логирование
    #[serde(default = "default_log_path")]
    pub log_path: String, // Пустая строка отключает запись в файл

    #[serde(default = "default_log_max_bytes")]
    pub log_max_bytes: u64, // Размер файла, после которого он ротируется

    #[serde(default = "default_log_backups")]
    pub log_backups: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sqlite_path() -> String { "database.db".into() }
fn default_db_init_attempts() -> u32 { 3 }
fn default_db_init_retry_delay_secs() -> u64 { 1 }
fn default_log_path() -> String { "bot.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_log_max_bytes() -> u64 { 5 * 1024 * 1024 }
fn default_log_backups() -> usize { 3 }

impl Config {
    /// Порядок источников: Config.toml -> YOGITA__* -> BOT_TOKEN / ADMIN_CHAT_ID.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let file = env::var("YOGITA_CONFIG").unwrap_or_else(|_| "Config.toml".into());
        let admin_chat_id = match env::var("ADMIN_CHAT_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<i64>()?),
            _ => None,
        };

        let loader = Loader::builder()
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("YOGITA").separator("__"))
            .set_override_option("telegram_token", env::var("BOT_TOKEN").ok())?
            .set_override_option("admin_chat_id", admin_chat_id)?
            .build()?;
        Ok(loader.try_deserialize()?)
    }
}
