pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub mod testing;
