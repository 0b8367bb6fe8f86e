use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ContainerStatus, PublishRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

const USER_AGENT: &str = "instaflow/0.1";
const TIMEOUT_SECS: u64 = 30;

pub struct GraphApiClient {
    http_client: Client,
    config: Config,
}

impl GraphApiClient {
    pub fn new(config: Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        GraphApiClient {
            http_client,
            config,
        }
    }

    fn auth_header(&self) -> String {
        format!(
            "Bearer {}",
            self.config.token.as_deref().unwrap_or_default()
        )
    }

    fn ig_user_id(&self) -> &str {
        self.config.ig_user_id.as_deref().unwrap_or_default()
    }

    /// Достаёт человекочитаемое сообщение из тела ошибки Graph API.
    /// Структурированное тело имеет вид {"error": {"message", "type", "code"}}.
    fn graph_error_message(status: StatusCode, body: &str) -> String {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            if let Some(message) = json["error"]["message"].as_str() {
                return format!("Graph API returned {}: {}", status, message);
            }
        }

        if body.trim().is_empty() {
            format!("Graph API returned {}", status)
        } else {
            format!("Graph API returned {}: {}", status, body.trim())
        }
    }

    /// Переводит не-2xx ответ в ошибку со статусом и деталями от Instagram
    async fn upstream_error(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        AppError::Upstream(Self::graph_error_message(status, &body))
    }
}

#[async_trait]
impl super::InstagramApi for GraphApiClient {
    async fn create_container(&self, request: &PublishRequest) -> AppResult<String> {
        debug!("Creating media container for: {}", request.image_url);

        let response = self
            .http_client
            .post(format!(
                "{}/{}/media",
                self.config.graph_api_url,
                self.ig_user_id()
            ))
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({
                "image_url": &request.image_url,
                "caption": &request.caption,
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to create media container: {}", e);
                AppError::Network(e)
            })?;

        if !response.status().is_success() {
            error!(
                "Container creation returned status: {}",
                response.status()
            );
            return Err(Self::upstream_error(response).await);
        }

        let result: Value = response.json().await.map_err(|e| {
            error!("Failed to parse container response: {}", e);
            AppError::Network(e)
        })?;

        if self.config.debug {
            debug!("Container response: {}", result);
        }

        let container_id = result["id"]
            .as_str()
            .ok_or(AppError::Upstream(
                "No container ID in response".to_string(),
            ))?
            .to_string();

        info!("Created media container: {}", container_id);
        Ok(container_id)
    }

    async fn container_status(&self, container_id: &str) -> AppResult<ContainerStatus> {
        let response = self
            .http_client
            .get(format!("{}/{}", self.config.graph_api_url, container_id))
            .header("Authorization", self.auth_header())
            .query(&[("fields", "status_code")])
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch container status: {}", e);
                AppError::Network(e)
            })?;

        if !response.status().is_success() {
            error!("Status check returned status: {}", response.status());
            return Err(Self::upstream_error(response).await);
        }

        let result: Value = response.json().await.map_err(|e| {
            error!("Failed to parse status response: {}", e);
            AppError::Network(e)
        })?;

        if self.config.debug {
            debug!("Status response: {}", result);
        }

        let status_code = result["status_code"].as_str().ok_or(AppError::Upstream(
            "No status_code in response".to_string(),
        ))?;

        debug!("Container {} status: {}", container_id, status_code);
        Ok(ContainerStatus::from_status_code(status_code))
    }

    async fn publish_container(&self, container_id: &str) -> AppResult<String> {
        debug!("Publishing media container: {}", container_id);

        let response = self
            .http_client
            .post(format!(
                "{}/{}/media_publish",
                self.config.graph_api_url,
                self.ig_user_id()
            ))
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({
                "creation_id": container_id,
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to publish container: {}", e);
                AppError::Network(e)
            })?;

        if !response.status().is_success() {
            error!("Publish returned status: {}", response.status());
            return Err(Self::upstream_error(response).await);
        }

        let result: Value = response.json().await.map_err(|e| {
            error!("Failed to parse publish response: {}", e);
            AppError::Network(e)
        })?;

        if self.config.debug {
            debug!("Publish response: {}", result);
        }

        let media_id = result["id"]
            .as_str()
            .ok_or(AppError::Upstream("No media ID in response".to_string()))?
            .to_string();

        info!("Successfully published media: {}", media_id);
        Ok(media_id)
    }
}
