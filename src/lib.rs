pub mod auth;
pub mod config;
pub mod database;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod messaging;
pub mod middleware;
pub mod services;

#[cfg(test)]
pub mod testing;
