//! Voice test endpoint

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};
use crate::speech::{VoiceSettings, clean_for_speech};
use crate::voice::SpokenClip;

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/test", post(test_voice))
        .with_state(state)
}

/// Voice test request
#[derive(Debug, Deserialize)]
pub struct VoiceTestRequest {
    #[serde(default)]
    pub text: String,
}

/// Voice test response
#[derive(Debug, Serialize)]
pub struct VoiceTestResponse {
    pub success: bool,
    pub message: &'static str,
    pub text: String,
    pub clip: SpokenClip,
}

/// Speak the text through the server's voice
async fn test_voice(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<VoiceTestRequest>, JsonRejection>,
) -> Result<Json<VoiceTestResponse>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::InvalidJson)?;
    tracing::info!(text = %request.text, "voice test request");

    let clip = state
        .voice
        .speak(&clean_for_speech(&request.text), VoiceSettings::default())
        .await;

    Ok(Json(VoiceTestResponse {
        success: true,
        message: "Voice test completed (server-side simulation)",
        text: request.text,
        clip,
    }))
}
