use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};

use recitation_application::{ScoreRecitationRequest, ScoreRecitationResponse};

use crate::{AppState, HttpError};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Scores one submitted recitation. Multipart fields follow the web
/// client's contract; both snake_case and camelCase names are accepted.
pub async fn score_recitation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScoreRecitationResponse>, HttpError> {
    let mut audio: Option<Vec<u8>> = None;
    let mut mime_type: Option<String> = None;
    let mut expected_text: Option<String> = None;
    let mut ayah_id: Option<String> = None;
    let mut session_id: Option<String> = None;
    let mut duration_seconds: Option<f64> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        HttpError::Validation {
            message: format!("invalid multipart payload: {err}"),
        }
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                mime_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|err| HttpError::Validation {
                    message: format!("failed to read audio field: {err}"),
                })?;
                audio = Some(bytes.to_vec());
            }
            Some("expected_text") | Some("expectedText") => {
                expected_text = Some(read_text(field).await?);
            }
            Some("ayah_id") | Some("ayahId") => {
                ayah_id = Some(read_text(field).await?).filter(|value| !value.trim().is_empty());
            }
            Some("session_id") | Some("sessionId") => {
                session_id = Some(read_text(field).await?).filter(|value| !value.trim().is_empty());
            }
            Some("duration_seconds") | Some("durationSeconds") => {
                let raw = read_text(field).await?;
                duration_seconds = raw.trim().parse().ok().filter(|value| *value >= 0.0);
            }
            _ => {}
        }
    }

    let audio = audio
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| HttpError::Validation {
            message: "Missing audio file".to_string(),
        })?;
    if audio.len() > state.max_audio_bytes {
        return Err(HttpError::PayloadTooLarge);
    }
    let expected_text = expected_text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| HttpError::Validation {
            message: "Missing expected text".to_string(),
        })?;

    let response = state
        .usecase
        .score(ScoreRecitationRequest {
            audio,
            mime_type,
            expected_text,
            ayah_id,
            session_id,
            duration_seconds,
        })
        .await?;

    Ok(Json(response))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, HttpError> {
    field.text().await.map_err(|err| HttpError::Validation {
        message: format!("failed to read form field: {err}"),
    })
}
