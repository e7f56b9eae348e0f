/// Recording upload and retrieval routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

/// Multipart field carrying the audio
const RECORDING_FIELD: &str = "recording";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingRequest {
    pub audio_id: String,
}

/// POST /upload
/// Store one `multipart/form-data` recording for the session user
pub async fn upload(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, String)> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::MalformedUpload("Missing Content-Type".to_string()))?;

    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| ServerError::MalformedUpload(format!("Expected multipart/form-data: {}", e)))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut recording: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::MalformedUpload(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() == Some(RECORDING_FIELD) {
            recording = Some(field.bytes().await.map_err(|e| {
                ServerError::MalformedUpload(format!("Failed to read recording: {}", e))
            })?);
        }
    }

    let recording = recording
        .filter(|data| !data.is_empty())
        .ok_or_else(|| ServerError::MalformedUpload("Missing recording attachment".to_string()))?;

    let name = app_state
        .recordings
        .store_recording(&user.id, &recording)
        .await?;

    Ok((StatusCode::CREATED, name))
}

/// POST /recording
/// A stored recording, base64 encoded
pub async fn recording(
    State(app_state): State<AppState>,
    Json(req): Json<RecordingRequest>,
) -> Result<String> {
    let data = app_state.recordings.read_recording(&req.audio_id).await?;
    Ok(STANDARD.encode(data))
}

/// GET /soundFile/:file
pub async fn sound_file(
    State(app_state): State<AppState>,
    Path(file): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>)> {
    let data = app_state.recordings.read_sound_file(&file).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], data))
}
