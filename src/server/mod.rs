//! HTTP transport boundary
//!
//! Exposes the crawler over a small JSON API:
//!
//! - `GET /` answers a health message
//! - `GET /tools` lists the crawl tool and its input schema
//! - `POST /scrape` runs one crawl of `{"url": ...}` and returns its outcome
//!
//! A crawl that fails to start or times out is still a 200 response carrying
//! `success: false`; only a missing URL is rejected with 400.

use crate::config::Config;
use crate::crawler::run_crawl;
use crate::SiteError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state of the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Body of a crawl request
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Builds the router with every route mounted
pub fn router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/tools", get(tools_handler))
        .route("/scrape", post(scrape_handler))
        .with_state(AppState { config })
}

/// Binds `bind` and serves until Ctrl-C
pub async fn serve(config: Arc<Config>, bind: &str) -> Result<(), SiteError> {
    let listener = TcpListener::bind(bind).await?;
    let local = listener.local_addr()?;
    tracing::info!("Site integrity API listening on http://{}", local);

    axum::serve(listener, router(config))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Site integrity crawler API is running" }))
}

/// Lists the tools this server offers, with JSON input schemas
pub async fn tools_handler() -> Json<Value> {
    Json(json!({
        "tools": [
            {
                "name": "scrape_website",
                "description": "Crawl a website and report error pages, broken links, blank pages and broken buttons",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "The URL to analyze"
                        }
                    },
                    "required": ["url"]
                }
            }
        ]
    }))
}

/// Runs one crawl and returns its outcome verbatim
pub async fn scrape_handler(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Response {
    let Some(url) = request.url.filter(|url| !url.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "URL is required" })),
        )
            .into_response();
    };

    tracing::info!("Scrape requested for {}", url);
    let outcome = run_crawl(&state.config, &url).await;
    if !outcome.is_success() {
        tracing::warn!("Scrape of {} did not produce a report", url);
    }

    (StatusCode::OK, Json(outcome)).into_response()
}

async fn wait_for_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn create_test_state() -> AppState {
        let mut config = Config::default();
        config.crawler.run_timeout_secs = 5;
        AppState {
            config: Arc::new(config),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_health() {
        let Json(body) = root_handler().await;
        assert_eq!(body["message"], "Site integrity crawler API is running");
    }

    #[tokio::test]
    async fn test_tools_listing() {
        let Json(body) = tools_handler().await;
        let tool = &body["tools"][0];
        assert_eq!(tool["name"], "scrape_website");
        assert_eq!(tool["inputSchema"]["required"][0], "url");
    }

    #[tokio::test]
    async fn test_missing_url_rejected() {
        let response = scrape_handler(
            State(create_test_state()),
            Json(ScrapeRequest::default()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn test_blank_url_rejected() {
        let request = ScrapeRequest {
            url: Some("   ".to_string()),
        };
        let response = scrape_handler(State(create_test_state()), Json(request)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_failure_payload() {
        let request = ScrapeRequest {
            url: Some("ftp://example.com".to_string()),
        };
        let response = scrape_handler(State(create_test_state()), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("scheme"));
    }
}
