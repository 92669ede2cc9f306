//! # API REST
//!
//! REST API implementation for NLQ.
//!
//! Handles:
//! - HTTP endpoints with axum (`/health`, `/query`, `/examples`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS for the browser form)
//!
//! Uses `api-shared` for wire types and `nlq-core` for the query pipeline.

#![warn(rust_2018_idioms)]

use api_shared::{
    AgeFilterRes, ConditionRes, ErrorRes, ExamplesRes, ExtractedIntent, HealthRes, HealthService,
    QueryReq, QueryRes,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use nlq_core::{QueryService, EXAMPLE_QUERIES};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    query_service: QueryService,
}

impl AppState {
    pub fn new(query_service: QueryService) -> Self {
        Self { query_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, process_query, examples),
    components(schemas(
        HealthRes,
        QueryReq,
        QueryRes,
        ExtractedIntent,
        AgeFilterRes,
        ConditionRes,
        ExamplesRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/query", post(process_query))
        .route("/examples", get(examples))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorRes::new(message)))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/query",
    request_body = QueryReq,
    responses(
        (status = 200, description = "Extracted intent, FHIR search and synthetic Bundle", body = QueryRes),
        (status = 400, description = "Missing, empty or malformed query", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Process a natural-language query
///
/// Extracts the structured intent from the query text, translates it into a FHIR search
/// and returns synthetic patients that satisfy every extracted predicate.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON for [`QueryReq`],
/// - the `query` field is missing, empty or whitespace-only.
///
/// Returns `500 Internal Server Error` for anything else.
#[axum::debug_handler]
async fn process_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryReq>, JsonRejection>,
) -> Result<Json<QueryRes>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        tracing::warn!("Rejected query body: {}", e.body_text());
        bad_request(e.body_text())
    })?;

    let Some(query) = req.query else {
        return Err(bad_request("Missing query parameter"));
    };

    match state.query_service.process(&query) {
        Ok(result) => Ok(Json(result.to_response())),
        Err(e) if e.is_validation() => Err(bad_request(e.to_string())),
        Err(e) => {
            tracing::error!("Process query error: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes::new("Internal error")),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/examples",
    responses(
        (status = 200, description = "Sample queries", body = ExamplesRes)
    )
)]
/// Sample queries for trying the service
#[axum::debug_handler]
async fn examples(State(_state): State<AppState>) -> Json<ExamplesRes> {
    Json(ExamplesRes {
        examples: EXAMPLE_QUERIES.iter().map(|q| q.to_string()).collect(),
    })
}
