// src/logger.rs

use crate::config::Config;
use anyhow::{Context, Result};
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Файл логов с ротацией по размеру: bot.log, bot.log.1 .. bot.log.<backups>
pub fn file_appender(path: &str, max_bytes: u64, backups: usize) -> Result<BasicRollingFileAppender> {
    BasicRollingFileAppender::new(path, RollingConditionBasic::new().max_size(max_bytes), backups)
        .with_context(|| format!("Не удалось открыть файл логов {}", path))
}

/// Инициализация логирования через tracing: консоль + файл (если задан log_path)
pub fn init(cfg: &Config) -> Result<()> {
    // RUST_LOG имеет приоритет над log_level из конфига
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    let console_layer = fmt::layer().with_target(false);

    let file_layer = if cfg.log_path.trim().is_empty() {
        None
    } else {
        let appender = file_appender(&cfg.log_path, cfg.log_max_bytes, cfg.log_backups)?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(appender)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Logger already initialized")?;

    tracing::info!(
        "Logger initialized. Log file: {:?} (max {} bytes, {} backups)",
        cfg.log_path,
        cfg.log_max_bytes,
        cfg.log_backups
    );
    Ok(())
}
