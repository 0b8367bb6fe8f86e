use serde::{Deserialize, Serialize};

/// Сырой запрос из веб-формы, до валидации.
/// Оба поля Option, чтобы отсутствие проверял валидатор, а не serde.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPublishRequest {
    pub image_url: Option<String>,
    pub caption: Option<String>,
}

/// Проверенный запрос на публикацию
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub image_url: String,
    pub caption: String,
}

/// Состояние медиа-контейнера на стороне Instagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    InProgress,
    Finished,
    Error,
    Expired,
    Published,
}

impl ContainerStatus {
    /// Разбирает значение поля status_code из ответа Graph API.
    /// Незнакомые коды считаются нетерминальными, опрос продолжается.
    pub fn from_status_code(code: &str) -> ContainerStatus {
        match code {
            "FINISHED" => ContainerStatus::Finished,
            "ERROR" => ContainerStatus::Error,
            "EXPIRED" => ContainerStatus::Expired,
            "PUBLISHED" => ContainerStatus::Published,
            _ => ContainerStatus::InProgress,
        }
    }
}

/// Результат успешной публикации
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub media_id: String,
}

/// Единый конверт ответа HTTP API
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PublishResult>,
}

impl ApiResponse {
    pub fn success(message: &str, details: PublishResult) -> Self {
        ApiResponse {
            ok: true,
            message: Some(message.to_string()),
            error: None,
            details: Some(details),
        }
    }

    pub fn failure(error: String) -> Self {
        ApiResponse {
            ok: false,
            message: None,
            error: Some(error),
            details: None,
        }
    }
}
