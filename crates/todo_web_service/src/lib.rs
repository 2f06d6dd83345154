pub mod config;
pub mod controllers;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod server;

pub use config::{ServerConfig, StorageBackend};
pub use server::{app_config, build_store, run, AppState, WebService};
