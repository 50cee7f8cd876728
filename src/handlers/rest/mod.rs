use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use axum_macros::debug_handler;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use serde_json::Value;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{
    dto::{DeletedResponse, ErrorResponse, NoteResponse, NoteTextRequest, StatusResponse},
    error::ApiError,
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_all_notes,
        create_note,
        update_note,
        delete_note,
        get_latest_note,
        create_note_alias
    ),
    components(schemas(
        NoteResponse,
        NoteTextRequest,
        StatusResponse,
        DeletedResponse,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API"),
        (name = "legacy", description = "Single-note endpoints kept for older clients")
    )
)]
pub struct ApiDoc;

pub fn router(service: Arc<NoteService>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/notes", get(get_all_notes).post(create_note))
        .route("/notes/{id}", put(update_note).delete(delete_note))
        .route("/note", get(get_latest_note).post(create_note_alias));

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(service)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Parses a `{text}` body, treating anything unreadable as an empty object.
fn parse_text_request(body: &[u8]) -> NoteTextRequest {
    match serde_json::from_slice::<Value>(body) {
        // Only objects count; arrays would otherwise deserialize positionally
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::debug!("ignoring malformed request body: {}", e);
            NoteTextRequest::default()
        }),
        Ok(_) => {
            tracing::debug!("ignoring non-object request body");
            NoteTextRequest::default()
        }
        Err(e) => {
            tracing::debug!("ignoring malformed request body: {}", e);
            NoteTextRequest::default()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is alive", body = StatusResponse)
    ),
    tag = "notes"
)]
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes, newest first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(
    State(service): State<Arc<NoteService>>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = service.get_all_notes().await?;
    Ok(Json(notes))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteTextRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Text is missing or blank", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    body: Bytes,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let note = service.create_note(parse_text_request(&body)).await?;
    tracing::info!("created note {}", note.id);
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = NoteTextRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Text is missing or blank", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = service.update_note(id, parse_text_request(&body)).await?;
    Ok(Json(note))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeletedResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    service.delete_note(id).await?;
    tracing::info!("deleted note {}", id);
    Ok(Json(DeletedResponse {
        status: "deleted".to_string(),
        id,
    }))
}

/// Returns `null` rather than 404 when there are no notes, as older clients expect.
#[utoipa::path(
    get,
    path = "/api/note",
    responses(
        (status = 200, description = "Most recent note, or null when there are none", body = NoteResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "legacy"
)]
#[debug_handler]
pub async fn get_latest_note(
    State(service): State<Arc<NoteService>>,
) -> Result<Json<Option<NoteResponse>>, ApiError> {
    let note = service.get_latest_note().await?;
    Ok(Json(note))
}

#[utoipa::path(
    post,
    path = "/api/note",
    request_body = NoteTextRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Text is missing or blank", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "legacy"
)]
#[debug_handler]
pub async fn create_note_alias(
    state: State<Arc<NoteService>>,
    body: Bytes,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    create_note(state, body).await
}
