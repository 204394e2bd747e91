pub mod analytics;
pub mod auth;
pub mod categories;
pub mod config;
pub mod constants;
pub mod currency;
pub mod database;
pub mod models;
pub mod settings;
pub mod transactions;
pub mod utils;
