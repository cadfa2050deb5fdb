use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    leaf::analyzer::{self, HealthAssessment},
    state::AppState,
};

pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-leaf", post(analyze_leaf))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// POST /api/analyze-leaf — bearer token required, multipart `file` field.
/// The raw bytes are persisted under the client-supplied filename before
/// analysis; the uploads mount serves them back without access control.
#[instrument(skip(state, multipart))]
pub async fn analyze_leaf(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<HealthAssessment>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::BadRequest("no filename provided".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
        upload = Some((filename, data));
    }

    let (filename, data) =
        upload.ok_or_else(|| ApiError::BadRequest("no file uploaded".into()))?;

    let path = state.storage.put_object(&filename, data).await?;
    let assessment = analyzer::analyze_file(&path).await?;

    info!(
        username = %username,
        file = %filename,
        status = ?assessment.health_status,
        green_percentage = assessment.green_percentage,
        "leaf analyzed"
    );
    Ok(Json(assessment))
}
