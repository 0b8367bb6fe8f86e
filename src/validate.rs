// validate.rs - проверка входящего запроса до обращения к Graph API

use crate::error::{AppError, AppResult};
use crate::models::{PublishRequest, RawPublishRequest};

/// Максимальная длина подписи, лимит платформы Instagram
pub const CAPTION_LIMIT: usize = 2200;

/// Проверяет сырой запрос и возвращает PublishRequest.
/// Собирает по одному сообщению на каждое нарушение; сеть не трогает.
pub fn validate_request(raw: &RawPublishRequest) -> AppResult<PublishRequest> {
    let mut violations: Vec<&str> = Vec::new();

    match raw.image_url.as_deref() {
        None => violations.push("Image URL is required"),
        Some(url) => {
            if reqwest::Url::parse(url).is_err() {
                violations.push("Provide a valid image URL accessible by Instagram");
            }
        }
    }

    match raw.caption.as_deref() {
        None => violations.push("Caption is required"),
        Some(caption) => {
            if caption.chars().count() > CAPTION_LIMIT {
                violations.push("Caption must be 2,200 characters or fewer");
            }
        }
    }

    match (&raw.image_url, &raw.caption) {
        (Some(image_url), Some(caption)) if violations.is_empty() => Ok(PublishRequest {
            image_url: image_url.clone(),
            caption: caption.clone(),
        }),
        _ => Err(AppError::Validation(violations.join("\n"))),
    }
}
