use std::sync::Arc;

use crate::infra::{AppState, Platform};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use brand_board::accounts::account_router;
use brand_board::brands::brand_router;
use brand_board::contacts::contact_router;
use brand_board::error::ApiError;
use brand_board::leaderboard::leaderboard_router;
use brand_board::media::ImageStore;
use brand_board::subscribers::subscriber_router;
use serde_json::json;

/// Compose every feature router plus the operational endpoints.
pub(crate) fn with_platform_routes(platform: &Platform) -> Router {
    Router::new()
        .merge(account_router(platform.accounts.clone()))
        .merge(brand_router(platform.brands.clone()))
        .merge(leaderboard_router(platform.leaderboard.clone()))
        .merge(contact_router(platform.contacts.clone()))
        .merge(subscriber_router(platform.subscribers.clone()))
        .merge(media_router(platform.images.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(platform.authority.clone()))
        .layer(Extension(platform.sessions.clone()))
}

pub(crate) fn media_router<M>(images: Arc<M>) -> Router
where
    M: ImageStore + 'static,
{
    Router::new()
        .route("/media/:key", get(media_endpoint::<M>))
        .with_state(images)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Serve an uploaded logo. The stored content type wins; otherwise it is
/// guessed from the original file name.
pub(crate) async fn media_endpoint<M>(
    State(images): State<Arc<M>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    M: ImageStore + 'static,
{
    let object = images
        .get(&key)?
        .ok_or_else(|| ApiError::not_found("media not found"))?;
    let content_type = object
        .content_type
        .clone()
        .unwrap_or_else(|| {
            mime_guess::from_path(&object.file_name)
                .first_or_octet_stream()
                .to_string()
        });

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        object.bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    use axum::body::Body;
    use axum::http::Request;
    use brand_board::config::{
        AppConfig, AppEnvironment, AuthConfig, MediaConfig, NotificationConfig, ServerConfig,
        TelemetryConfig,
    };
    use brand_board::media::ImageUpload;
    use brand_board::store::MemoryImageStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "warn".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "routes-secret".to_string(),
                token_ttl_hours: 1,
                bcrypt_cost: 4,
                bootstrap_admin: None,
            },
            media: MediaConfig {
                public_base_url: "/media".to_string(),
            },
            notifications: NotificationConfig { notify_email: None },
        }
    }

    fn app(ready: bool) -> Router {
        let platform = Platform::build(&config());
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_platform_routes(&platform).layer(Extension(state))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = app(false)
            .oneshot(get_request("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(get_request("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn feature_routes_are_mounted() {
        let router = app(true);

        let health = router
            .clone()
            .oneshot(get_request("/health"))
            .await
            .expect("route executes");
        assert_eq!(health.status(), StatusCode::OK);

        let brands = router
            .clone()
            .oneshot(get_request("/api/brands"))
            .await
            .expect("route executes");
        assert_eq!(brands.status(), StatusCode::OK);

        let leaderboard = router
            .oneshot(get_request("/api/leaderboard"))
            .await
            .expect("route executes");
        assert_eq!(leaderboard.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn media_endpoint_serves_stored_bytes() {
        let images = Arc::new(MemoryImageStore::new("/media"));
        let stored = images
            .put(&ImageUpload {
                file_name: "logo.svg".to_string(),
                content_type: None,
                bytes: b"<svg/>".to_vec(),
            })
            .expect("stored");
        let router = media_router(images);

        let response = router
            .clone()
            .oneshot(get_request(&format!("/media/{}", stored.key)))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/svg+xml"
        );

        let missing = router
            .oneshot(get_request("/media/nope.png"))
            .await
            .expect("route executes");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    fn register_request(email: &str) -> Request<Body> {
        Request::post("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": email, "password": "correct-horse" }).to_string(),
            ))
            .expect("request builds")
    }

    #[tokio::test]
    async fn registration_only_bootstraps_the_first_admin() {
        let router = app(true);

        let owner = router
            .clone()
            .oneshot(register_request("owner@example.com"))
            .await
            .expect("route executes");
        assert_eq!(owner.status(), StatusCode::CREATED);

        let stranger = router
            .oneshot(register_request("stranger@example.com"))
            .await
            .expect("route executes");
        assert_eq!(stranger.status(), StatusCode::FORBIDDEN);
    }
}
