// src/storage/mod.rs

pub mod content;
pub mod db;
pub mod leads;
pub mod schema;

pub use db::Db;
pub use schema::{
    Contact, Event, Faq, MenuItem, Mentor, OrderRow, Price, PriceDetail, Program, Retreat, Review,
    UserRow, VisitRow,
};
