pub mod auth;
pub mod bot;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod locale;
pub mod middleware;
pub mod services;
pub mod types;
pub mod validation;
