//! JSON HTTP API.
//!
//! Exposes the search operations to browser clients. The search endpoints
//! return the exact result contract the results view renders:
//!
//! ```json
//! [{ "department": "BCA", "subject": "DBMS",
//!    "staffName": "Mr. C. Santhosh Kumar", "status": "assigned" }]
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Query | Description |
//! |--------|------|-------|-------------|
//! | `GET` | `/departments` | — | Department catalog |
//! | `GET` | `/staff` | — | Staff roster for the dropdown |
//! | `GET` | `/search/staff` | `name`, `day`, `period` | Staff schedule for one slot |
//! | `GET` | `/search/department` | `id`, `day`, `period` | Department schedule for one slot |
//! | `GET` | `/health` | — | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "name must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `search_error` (500).
//! A fallback-answered request is indistinguishable in shape from a
//! remote-answered one; backend failures never surface here unless the
//! fallback failed too.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the timetable pages can
//! call the API from any host.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::models::{DepartmentRef, SearchResult, StaffRef};
use crate::search::SearchService;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    service: Arc<SearchService>,
}

/// Start the HTTP server.
///
/// Binds to the address configured in `[server].bind` and serves until the
/// process is terminated.
pub async fn run_server(config: &Config, service: SearchService) -> anyhow::Result<()> {
    let state = AppState {
        service: Arc::new(service),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/departments", get(handle_departments))
        .route("/staff", get(handle_staff))
        .route("/search/staff", get(handle_staff_search))
        .route("/search/department", get(handle_department_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("Timetable API listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn search_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "search_error".to_string(),
        message: message.into(),
    }
}

/// Map search failures to the most appropriate status code. A strict-policy
/// unknown department is the caller's mistake, not a server fault.
fn classify_search_error(err: anyhow::Error) -> AppError {
    let msg = err.to_string();
    if msg.contains("unknown department") {
        not_found(msg)
    } else {
        search_error(msg)
    }
}

/// Parse the `period` query parameter, which the forms submit as a string.
fn parse_period(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(period) if period > 0 => Ok(period),
        _ => Err(bad_request(format!(
            "period must be a positive integer, got '{}'",
            raw
        ))),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /departments, GET /staff ============

async fn handle_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentRef>>, AppError> {
    let departments = state
        .service
        .departments()
        .await
        .map_err(classify_search_error)?;
    Ok(Json(departments))
}

async fn handle_staff(State(state): State<AppState>) -> Result<Json<Vec<StaffRef>>, AppError> {
    let staff = state.service.all_staff().await.map_err(classify_search_error)?;
    Ok(Json(staff))
}

// ============ GET /search/staff ============

#[derive(Deserialize)]
struct StaffSearchParams {
    name: String,
    day: String,
    period: String,
}

async fn handle_staff_search(
    State(state): State<AppState>,
    Query(params): Query<StaffSearchParams>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(bad_request("name must not be empty"));
    }
    let period = parse_period(&params.period)?;

    let results = state
        .service
        .search_by_staff(name, &params.day, period)
        .await
        .map_err(classify_search_error)?;
    Ok(Json(results))
}

// ============ GET /search/department ============

#[derive(Deserialize)]
struct DepartmentSearchParams {
    id: String,
    day: String,
    period: String,
}

async fn handle_department_search(
    State(state): State<AppState>,
    Query(params): Query<DepartmentSearchParams>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let id = params.id.trim();
    if id.is_empty() {
        return Err(bad_request("id must not be empty"));
    }
    let period = parse_period(&params.period)?;

    let results = state
        .service
        .search_by_department(id, &params.day, period)
        .await
        .map_err(classify_search_error)?;
    Ok(Json(results))
}
