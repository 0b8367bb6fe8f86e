use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, RawPublishRequest};
use crate::publisher::Publisher;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

const SUCCESS_MESSAGE: &str = "Instagram post successfully published";

pub async fn run_http_server(config: Arc<Config>) -> AppResult<()> {
    let bind_addr = format!("{}:{}", config.address, config.port);

    let publisher = Arc::new(Publisher::new(&config));
    let app = router(publisher);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("HTTP server listening on: {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Собирает роутер; отделён от run_http_server ради тестов
pub fn router(publisher: Arc<Publisher>) -> Router {
    Router::new()
        .route("/api/publish", post(publish_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(publisher)
}

/// Каждый запрос проходит полный цикл публикации независимо;
/// общего изменяемого состояния между запросами нет.
async fn publish_handler(
    State(publisher): State<Arc<Publisher>>,
    body: Result<Json<RawPublishRequest>, JsonRejection>,
) -> Response {
    let result = match body {
        Ok(Json(raw)) => publisher.publish(&raw).await,
        // Некорректный JSON тоже ошибка вызывающего, отдаём 400 в общем конверте
        Err(rejection) => Err(AppError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    };

    match result {
        Ok(details) => {
            debug!("Publish succeeded: {}", details.media_id);
            (
                StatusCode::OK,
                Json(ApiResponse::success(SUCCESS_MESSAGE, details)),
            )
                .into_response()
        }
        Err(e) => {
            error!("Publish failed ({:?}): {}", e.kind(), e);
            (e.http_status(), Json(ApiResponse::failure(e.to_string()))).into_response()
        }
    }
}
