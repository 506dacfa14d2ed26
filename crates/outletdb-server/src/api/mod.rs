mod chat;
mod outlets;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use outletdb_core::engine::{InMemorySelectionStore, QueryResolver, SubstringMatcher};
use outletdb_db::PgOutletDirectory;
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, RequestId};

/// The concrete resolver wiring used by the HTTP surface.
pub type Resolver = QueryResolver<PgOutletDirectory, SubstringMatcher, InMemorySelectionStore>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub resolver: Arc<Resolver>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, selection_ttl: Duration) -> Self {
        let resolver = QueryResolver::new(
            PgOutletDirectory::new(pool.clone()),
            SubstringMatcher,
            InMemorySelectionStore::new(selection_ttl),
        );
        Self {
            pool,
            resolver: Arc::new(resolver),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &outletdb_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    // The original outlet API served a public map frontend from any origin.
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/outlets", get(outlets::list_outlets))
        .route("/api/v1/outlets/search", get(outlets::search_outlets))
        .route("/api/v1/outlets/city", get(outlets::outlets_by_city))
        .route("/api/v1/outlets/nearby", get(outlets::nearby_outlets))
        .route("/api/v1/query", get(chat::resolve_query))
        .route("/api/v1/query/select", get(chat::resolve_selection))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match outletdb_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::outlets::OutletItem;
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use outletdb_db::{upsert_outlets, NewOutlet};
    use tower::ServiceExt;

    fn test_state(pool: PgPool) -> AppState {
        AppState::new(pool, Duration::from_secs(300))
    }

    fn new_outlet(name: &str, address: &str, hours: &str) -> NewOutlet {
        NewOutlet {
            name: name.to_string(),
            address: address.to_string(),
            operating_hours: Some(hours.to_string()),
            latitude: Some("3.1309".to_string()),
            longitude: Some("101.6703".to_string()),
            waze_link: None,
        }
    }

    async fn seed_two_outlets(pool: &PgPool) {
        upsert_outlets(
            pool,
            &[
                new_outlet("Subway Bangsar", "1 Jalan Bangsar", "8:00 AM - 10:00 PM"),
                new_outlet("Subway Ampang", "2 Jalan Ampang", "9:00 AM - 9:00 PM"),
            ],
        )
        .await
        .expect("seed outlets");
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn outlet_item_is_serializable() {
        let item = OutletItem {
            id: 1,
            name: "Subway Bangsar".to_string(),
            address: "1 Jalan Bangsar".to_string(),
            operating_hours: Some("8:00 AM - 10:00 PM".to_string()),
            latitude: Some("3.1309".to_string()),
            longitude: Some("101.6703".to_string()),
            waze_link: None,
        };
        let json = serde_json::to_string(&item).expect("serialize OutletItem");
        assert!(json.contains("\"address\":\"1 Jalan Bangsar\""));
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_outlets_returns_seeded_rows(pool: PgPool) {
        seed_two_outlets(&pool).await;
        let app = build_app(test_state(pool));

        let (status, json) = get_json(app, "/api/v1/outlets").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["address"].as_str(), Some("1 Jalan Bangsar"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_outlets_filters_by_name(pool: PgPool) {
        seed_two_outlets(&pool).await;
        let app = build_app(test_state(pool));

        let (status, json) = get_json(app, "/api/v1/outlets/search?name=ampang").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"].as_str(), Some("Subway Ampang"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn outlets_by_city_filters_by_address(pool: PgPool) {
        seed_two_outlets(&pool).await;
        let app = build_app(test_state(pool));

        let (status, json) = get_json(app, "/api/v1/outlets/city?city=bangsar").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["address"].as_str(), Some("1 Jalan Bangsar"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn nearby_outlets_uses_default_radius(pool: PgPool) {
        let mut far = new_outlet("Subway Ampang", "2 Jalan Ampang", "9:00 AM - 9:00 PM");
        far.latitude = Some("3.5000".to_string());
        far.longitude = Some("101.9000".to_string());
        upsert_outlets(
            &pool,
            &[
                new_outlet("Subway Bangsar", "1 Jalan Bangsar", "8:00 AM - 10:00 PM"),
                far,
            ],
        )
        .await
        .expect("seed outlets");
        let app = build_app(test_state(pool));

        let (status, json) =
            get_json(app, "/api/v1/outlets/nearby?lat=3.1309&lon=101.6703").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["address"].as_str(), Some("1 Jalan Bangsar"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn query_endpoint_answers_hours_question(pool: PgPool) {
        seed_two_outlets(&pool).await;
        let app = build_app(test_state(pool));

        let (status, json) = get_json(
            app,
            "/api/v1/query?query=what%20time%20does%20the%20outlet%20in%20bangsar%20close&user_id=u1",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"].as_str(), Some("success"));
        assert_eq!(json["name"].as_str(), Some("Subway Bangsar"));
        assert_eq!(json["operating_hours"].as_str(), Some("8:00 AM - 10:00 PM"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn query_endpoint_reports_unknown_location(pool: PgPool) {
        seed_two_outlets(&pool).await;
        let app = build_app(test_state(pool));

        let (status, json) =
            get_json(app, "/api/v1/query?query=outlet%20in%20cheras&user_id=u1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"].as_str(), Some("error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn ambiguous_query_then_selection_flow(pool: PgPool) {
        seed_two_outlets(&pool).await;
        let state = test_state(pool);

        let (status, json) = get_json(
            build_app(state.clone()),
            "/api/v1/query?query=outlet%20in%20jalan&user_id=u1",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"].as_str(), Some("multiple"));
        assert_eq!(json["options"].as_array().map(Vec::len), Some(2));

        // Selection state lives in AppState, so reuse it for the follow-up.
        let (status, json) = get_json(
            build_app(state.clone()),
            "/api/v1/query/select?user_id=u1&choice=2",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"].as_str(), Some("success"));
        assert_eq!(json["address"].as_str(), Some("2 Jalan Ampang"));

        // Consumed exactly once.
        let (_, json) = get_json(
            build_app(state),
            "/api/v1/query/select?user_id=u1&choice=2",
        )
        .await;
        assert_eq!(json["status"].as_str(), Some("error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn selection_with_out_of_range_choice_is_an_error(pool: PgPool) {
        seed_two_outlets(&pool).await;
        let state = test_state(pool);

        get_json(
            build_app(state.clone()),
            "/api/v1/query?query=outlet%20in%20jalan&user_id=u1",
        )
        .await;

        let (status, json) = get_json(
            build_app(state),
            "/api/v1/query/select?user_id=u1&choice=99",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"].as_str(), Some("error"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn responses_carry_request_id_header(pool: PgPool) {
        let app = build_app(test_state(pool));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/outlets")
                    .header("x-request-id", "test-req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("test-req-42")
        );
    }
}
