use clap::Parser;

use crate::error::AppError;

#[derive(Parser, Debug, Clone)]
#[command(name = "InstaFlow")]
#[command(author = "Dabe Vlohn")]
#[command(version = "0.1.0")]
#[command(about = "Web form to Instagram Graph API publishing gateway")]
pub struct Config {
    /// Access token для Instagram Graph API
    /// Задаётся через env: INSTAFLOW_TOKEN (ОБЯЗАТЕЛЕН)
    #[arg(long, env = "INSTAFLOW_TOKEN")]
    pub token: Option<String>,

    /// Идентификатор Instagram Business аккаунта
    /// Задаётся через env: INSTAFLOW_IG_USER_ID (ОБЯЗАТЕЛЕН)
    #[arg(long, env = "INSTAFLOW_IG_USER_ID")]
    pub ig_user_id: Option<String>,

    /// IP адрес для прослушивания
    /// По умолчанию: 127.0.0.1
    /// env: INSTAFLOW_ADDRESS
    #[arg(long, env = "INSTAFLOW_ADDRESS", default_value = "127.0.0.1")]
    pub address: String,

    /// HTTP порт (по умолчанию: 8080)
    /// env: INSTAFLOW_PORT
    #[arg(long, env = "INSTAFLOW_PORT", default_value = "8080")]
    pub port: u16,

    /// Базовый URL Graph API (переопределяется в тестах)
    /// env: INSTAFLOW_GRAPH_API_URL
    #[arg(
        long,
        env = "INSTAFLOW_GRAPH_API_URL",
        default_value = "https://graph.facebook.com/v19.0"
    )]
    pub graph_api_url: String,

    /// Интервал опроса статуса медиа-контейнера, секунды
    /// env: INSTAFLOW_POLL_INTERVAL_SECS
    #[arg(long, env = "INSTAFLOW_POLL_INTERVAL_SECS", default_value = "5")]
    pub poll_interval_secs: u64,

    /// Общий дедлайн ожидания готовности контейнера, секунды
    /// env: INSTAFLOW_POLL_TIMEOUT_SECS
    #[arg(long, env = "INSTAFLOW_POLL_TIMEOUT_SECS", default_value = "90")]
    pub poll_timeout_secs: u64,

    /// Debug режим: выводить JSON ответов Graph API
    #[arg(long, env = "INSTAFLOW_DEBUG")]
    pub debug: bool,
}

impl Config {
    /// Валидирует конфигурацию при запуске
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if self.token.is_none() {
            return Err(AppError::Config(
                "Публикация требует access token. Предоставьте --token или INSTAFLOW_TOKEN"
                    .to_string(),
            ));
        }

        if self.ig_user_id.is_none() {
            return Err(AppError::Config(
                "Не задан Instagram Business аккаунт. Предоставьте --ig-user-id или INSTAFLOW_IG_USER_ID"
                    .to_string(),
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "Интервал опроса должен быть больше нуля".to_string(),
            ));
        }

        if self.poll_timeout_secs < self.poll_interval_secs {
            return Err(AppError::Config(
                "Дедлайн опроса не может быть меньше интервала".to_string(),
            ));
        }

        Ok(())
    }
}
