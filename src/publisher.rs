// publisher.rs - оркестратор полного цикла публикации

use crate::api::InstagramApi;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ContainerStatus, PublishResult, RawPublishRequest};
use crate::validate::validate_request;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Абстракция сна для цикла опроса, подменяется в тестах
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Сон на tokio таймере
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct Publisher {
    api: Box<dyn InstagramApi>,
    sleeper: Box<dyn Sleeper>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl Publisher {
    pub fn new(config: &Config) -> Self {
        Publisher::with_parts(
            crate::api::create_api_client(config),
            Box::new(TokioSleeper),
            Duration::from_secs(config.poll_interval_secs),
            Duration::from_secs(config.poll_timeout_secs),
        )
    }

    pub fn with_parts(
        api: Box<dyn InstagramApi>,
        sleeper: Box<dyn Sleeper>,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Self {
        Publisher {
            api,
            sleeper,
            poll_interval,
            poll_timeout,
        }
    }

    /// Выполняет полный цикл публикации: валидация, создание контейнера,
    /// ожидание готовности, публикация. Каждый шаг выполняется не более
    /// одного раза; повторные попытки остаются на стороне вызывающего.
    pub async fn publish(&self, raw: &RawPublishRequest) -> AppResult<PublishResult> {
        let request = validate_request(raw)?;

        let container_id = self.api.create_container(&request).await?;

        self.wait_until_ready(&container_id).await?;

        let media_id = self.api.publish_container(&container_id).await?;

        info!(
            "Published media {} from container {}",
            media_id, container_id
        );
        Ok(PublishResult { media_id })
    }

    /// Опрашивает состояние контейнера до готовности или дедлайна.
    /// Брошенный контейнер не удаляется, на стороне Instagram он истечёт сам.
    async fn wait_until_ready(&self, container_id: &str) -> AppResult<()> {
        let interval_secs = self.poll_interval.as_secs().max(1);
        let max_attempts = self.poll_timeout.as_secs().div_ceil(interval_secs).max(1);

        for attempt in 1..=max_attempts {
            match self.api.container_status(container_id).await? {
                ContainerStatus::Finished => {
                    debug!(
                        "Container {} ready after {} poll(s)",
                        container_id, attempt
                    );
                    return Ok(());
                }
                ContainerStatus::Error => {
                    return Err(AppError::Upstream(format!(
                        "Instagram failed to process media container {}",
                        container_id
                    )));
                }
                ContainerStatus::Expired => {
                    return Err(AppError::Upstream(format!(
                        "Media container {} expired before it was published",
                        container_id
                    )));
                }
                ContainerStatus::InProgress | ContainerStatus::Published => {
                    if attempt < max_attempts {
                        self.sleeper.sleep(self.poll_interval).await;
                    }
                }
            }
        }

        warn!(
            "Container {} not ready after {:?}",
            container_id, self.poll_timeout
        );
        Err(AppError::ContainerTimeout(self.poll_timeout.as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::PublishRequest;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Не спит вовсе, чтобы тесты не ждали настоящие таймеры
    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    struct FakeApi {
        create_result: Result<String, String>,
        statuses: Mutex<VecDeque<ContainerStatus>>,
        publish_result: Result<String, String>,
        create_calls: AtomicUsize,
        status_calls: AtomicUsize,
        publish_calls: AtomicUsize,
    }

    impl FakeApi {
        fn happy(statuses: Vec<ContainerStatus>) -> Arc<FakeApi> {
            Arc::new(FakeApi {
                create_result: Ok("c1".to_string()),
                statuses: Mutex::new(statuses.into()),
                publish_result: Ok("m1".to_string()),
                create_calls: AtomicUsize::new(0),
                status_calls: AtomicUsize::new(0),
                publish_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl InstagramApi for Arc<FakeApi> {
        async fn create_container(&self, _request: &PublishRequest) -> AppResult<String> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.create_result.clone().map_err(AppError::Upstream)
        }

        async fn container_status(&self, _container_id: &str) -> AppResult<ContainerStatus> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            // Пустая очередь означает вечный IN_PROGRESS
            Ok(self
                .statuses
                .lock()
                .expect("statuses lock")
                .pop_front()
                .unwrap_or(ContainerStatus::InProgress))
        }

        async fn publish_container(&self, _container_id: &str) -> AppResult<String> {
            self.publish_calls.fetch_add(1, Ordering::SeqCst);
            self.publish_result.clone().map_err(AppError::Upstream)
        }
    }

    fn publisher(api: &Arc<FakeApi>, interval_secs: u64, timeout_secs: u64) -> Publisher {
        Publisher::with_parts(
            Box::new(Arc::clone(api)),
            Box::new(NoSleep),
            Duration::from_secs(interval_secs),
            Duration::from_secs(timeout_secs),
        )
    }

    fn raw(image_url: &str, caption: &str) -> RawPublishRequest {
        RawPublishRequest {
            image_url: Some(image_url.to_string()),
            caption: Some(caption.to_string()),
        }
    }

    #[tokio::test]
    async fn test_publish_happy_path() {
        let api = FakeApi::happy(vec![ContainerStatus::Finished]);
        let result = publisher(&api, 1, 3)
            .publish(&raw("https://example.com/a.jpg", "Hello"))
            .await
            .expect("should publish");

        assert_eq!(result.media_id, "m1");
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.publish_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_publish_waits_for_finished() {
        let api = FakeApi::happy(vec![
            ContainerStatus::InProgress,
            ContainerStatus::InProgress,
            ContainerStatus::Finished,
        ]);
        let result = publisher(&api, 1, 10)
            .publish(&raw("https://example.com/a.jpg", "Hello"))
            .await
            .expect("should publish");

        assert_eq!(result.media_id, "m1");
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_deadline_is_transient_and_skips_publish() {
        let api = FakeApi::happy(vec![]);
        let err = publisher(&api, 1, 3)
            .publish(&raw("https://example.com/a.jpg", "Hello"))
            .await
            .expect_err("should time out");

        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 3);
        assert_eq!(api.publish_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_container_error_is_upstream_and_skips_publish() {
        let api = FakeApi::happy(vec![ContainerStatus::Error]);
        let err = publisher(&api, 1, 3)
            .publish(&raw("https://example.com/a.jpg", "Hello"))
            .await
            .expect_err("should fail");

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(api.publish_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_container_expired_is_upstream() {
        let api = FakeApi::happy(vec![ContainerStatus::Expired]);
        let err = publisher(&api, 1, 3)
            .publish(&raw("https://example.com/a.jpg", "Hello"))
            .await
            .expect_err("should fail");

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.to_string().contains("expired"));
        assert_eq!(api.publish_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_network() {
        let api = FakeApi::happy(vec![ContainerStatus::Finished]);
        let caption = "a".repeat(crate::validate::CAPTION_LIMIT + 1);
        let err = publisher(&api, 1, 3)
            .publish(&raw("https://example.com/a.jpg", &caption))
            .await
            .expect_err("should fail");

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.publish_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_failure_skips_polling() {
        let api = Arc::new(FakeApi {
            create_result: Err("Graph API returned 400: bad image".to_string()),
            statuses: Mutex::new(VecDeque::new()),
            publish_result: Ok("m1".to_string()),
            create_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            publish_calls: AtomicUsize::new(0),
        });
        let err = publisher(&api, 1, 3)
            .publish(&raw("https://example.com/a.jpg", "Hello"))
            .await
            .expect_err("should fail");

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.publish_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_published_status_keeps_polling_until_deadline() {
        let api = FakeApi::happy(vec![ContainerStatus::Published]);
        let err = publisher(&api, 1, 2)
            .publish(&raw("https://example.com/a.jpg", "Hello"))
            .await
            .expect_err("should time out");

        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 2);
    }
}
