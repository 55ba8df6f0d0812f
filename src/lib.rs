pub mod catalog;
pub mod config;
pub mod handlers;
pub mod logger;
pub mod messenger;
pub mod models;
pub mod storage;
pub mod telegram;
pub mod utils;
