pub mod graph;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{ContainerStatus, PublishRequest};
use async_trait::async_trait;

/// Абстрактный интерфейс к Instagram Graph API
#[async_trait]
pub trait InstagramApi: Send + Sync {
    /// Создаёт медиа-контейнер для изображения и подписи.
    /// Возвращает идентификатор контейнера, не гарантию готовности.
    async fn create_container(&self, request: &PublishRequest) -> AppResult<String>;

    /// Читает текущее состояние контейнера
    async fn container_status(&self, container_id: &str) -> AppResult<ContainerStatus>;

    /// Публикует готовый контейнер и возвращает идентификатор поста
    async fn publish_container(&self, container_id: &str) -> AppResult<String>;
}

/// Фабрика для создания API клиента на основе конфигурации
pub fn create_api_client(config: &Config) -> Box<dyn InstagramApi> {
    Box::new(graph::GraphApiClient::new(config.clone()))
}
