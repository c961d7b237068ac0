pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod listing;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
