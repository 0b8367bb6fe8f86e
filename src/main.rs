use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod http;
mod models;
mod publisher;
mod validate;

use config::Config;
use error::AppResult;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Инициализируем логирование
    init_tracing()?;

    // Парсим конфигурацию из CLI и env
    let config = Config::parse();

    // Валидируем конфигурацию
    config.validate()?;

    info!(
        "Starting InstaFlow gateway - IG user: {}, Listen: {}:{}",
        config.ig_user_id.as_deref().unwrap_or("-"),
        config.address,
        config.port
    );

    // HTTP сервер работает до остановки процесса
    http::server::run_http_server(Arc::new(config)).await
}

/// Инициализирует систему логирования с использованием tracing
fn init_tracing() -> AppResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .init();

    info!("Tracing initialized");
    Ok(())
}
