// src/storage/db.rs
use super::schema::apply_migrations;
use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct Db {
    pub pool: SqlitePool,
}

impl Db {
    /// Подключается к SQLite, создаёт файл, если его нет,
    /// и проверяет/создаёт таблицы.
    pub async fn connect(path: &str) -> Result<Self> {
        // 1) абсолютный путь к файлу
        let abs_path: PathBuf = {
            let p = PathBuf::from(path);
            if p.is_absolute() {
                p
            } else {
                env::current_dir()?.join(p)
            }
        };

        // 2) создаём папку, если нужна
        if let Some(dir) = abs_path.parent() {
            if !dir.exists() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Не удалось создать директорию {:?}", dir))?;
                info!("Created database directory {:?}", dir);
            }
        }

        if abs_path.exists() {
            info!("Connecting to existing database {:?}", abs_path);
        } else {
            info!("Creating new database {:?}", abs_path);
        }

        let opts = SqliteConnectOptions::new()
            .filename(&abs_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePool::connect_with(opts)
            .await
            .with_context(|| format!("Не удалось открыть базу {:?}", abs_path))?;
        apply_migrations(&pool).await?;

        Ok(Db { pool })
    }

    /// База в памяти на одном соединении (для тестов и прогонов без файла)
    pub async fn connect_in_memory() -> Result<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        apply_migrations(&pool).await?;
        Ok(Db { pool })
    }

    /// Подключение с фиксированным числом попыток
    pub async fn connect_with_retry(path: &str, attempts: u32, delay: Duration) -> Result<Self> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            match Self::connect(path).await {
                Ok(db) => return Ok(db),
                Err(e) if attempt < attempts => {
                    warn!("Database init attempt {}/{} failed: {:#}", attempt, attempts, e);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Database init failed after {} attempts: {:#}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("Database connection closed");
        }
    }
}
