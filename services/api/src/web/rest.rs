//! services/api/src/web/rest.rs
//!
//! Contains the Axum handler for the REST API endpoint and the master
//! definition for the OpenAPI specification.

use crate::web::{
    plan_task::plan_process,
    protocol::{
        ErrorBody, GenerateResponse, GenerationRequest, ResponseMeta, INTERNAL_SERVER_ERROR,
        MISSING_SUBJECT,
    },
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_handler,
    ),
    components(
        schemas(GenerationRequest, GenerateResponse, ResponseMeta, ErrorBody)
    ),
    tags(
        (name = "Study Planner API", description = "Generates study plans and quizzes from a subject.")
    )
)]
pub struct ApiDoc;

/// Builds the API routes with the shared state attached.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generate", post(generate_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(app_state)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a study plan.
///
/// Dispatches to the simple, structured or enhanced flow and optionally attaches
/// one quiz per plan topic. Any body that is not a JSON object with a non-blank
/// `subject` is rejected.
#[utoipa::path(
    post,
    path = "/generate",
    request_body(content = GenerationRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Plan generated", body = GenerateResponse),
        (status = 400, description = "Missing subject", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorBody>)> {
    let payload = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    let request = GenerationRequest::from_json(&payload).map_err(|e| {
        warn!("Rejected generate request: {}", e);
        (StatusCode::BAD_REQUEST, Json(ErrorBody::new(MISSING_SUBJECT)))
    })?;

    let span = info_span!(
        "generate",
        request_id = %Uuid::new_v4(),
        flow_mode = request.resolved_flow().as_str(),
        subject = %request.subject,
    );

    async move {
        info!("Generate request received.");
        match plan_process(app_state, request).await {
            Ok(response) => Ok(Json(response)),
            Err(e) => {
                error!("Failed to generate plan: {:?}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(INTERNAL_SERVER_ERROR)),
                ))
            }
        }
    }
    .instrument(span)
    .await
}
