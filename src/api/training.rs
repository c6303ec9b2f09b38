//! Training endpoints: scenarios, message scoring and cadence plans

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};
use crate::speech::Emotion;
use crate::timing::{CadencePlan, Pace};
use crate::training::{QualityScores, Scenario, scenarios, score_message};

/// Build training router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/scenarios", get(list_scenarios))
        .route("/analyze", post(analyze))
        .route("/cadence", post(cadence))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub scenarios: Vec<Scenario>,
}

async fn list_scenarios() -> Json<ScenariosResponse> {
    Json(ScenariosResponse {
        scenarios: scenarios(),
    })
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: QualityScores,
}

/// Score an agent message
async fn analyze(
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::InvalidJson)?;
    let analysis = score_message(&request.message, &mut rand::thread_rng());

    let preview: String = request.message.chars().take(50).collect();
    tracing::info!(
        message = %preview,
        empathy = analysis.empathy_score,
        professionalism = analysis.professionalism_score,
        "analyzed message"
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CadenceRequest {
    pub text: String,
    #[serde(default)]
    pub pace: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
}

/// Plan how a piece of text would be delivered
async fn cadence(
    body: Result<Json<CadenceRequest>, JsonRejection>,
) -> Result<Json<CadencePlan>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::InvalidJson)?;

    let pace = request
        .pace
        .as_deref()
        .map(str::parse::<Pace>)
        .transpose()?
        .unwrap_or_default();
    let emotion = request
        .emotion
        .as_deref()
        .map(str::parse::<Emotion>)
        .transpose()?
        .unwrap_or_default();

    let plan = CadencePlan::new(&request.text, pace, emotion);
    tracing::debug!(pace = %pace, emotion = %emotion, chunks = plan.chunks.len(), "planned cadence");
    Ok(Json(plan))
}
