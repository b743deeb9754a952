// HTTP API routes (draft completion, lane validation, static data).

use axum::{
    extract::{Json, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::analysis;
use crate::data::StaticData;
use crate::draft::{normalize_hero, AnalyzeRequest, DraftState};
use crate::lanes::{Lane, TEAM_SIZE};
use crate::metrics;
use crate::oracle::{decode_reply, Oracle, OracleError};
use crate::prompt;

// ── Request types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidateLaneRequest {
    #[serde(default)]
    pub hero: String,
    #[serde(default)]
    pub lane: String,
}

/// Shape a lane-validation reply must have. Only used to check the reply;
/// the reply itself is returned as parsed.
#[derive(Debug, Deserialize, Serialize)]
pub struct LaneVerdict {
    pub recommended_lanes: Vec<String>,
    pub is_optimal: bool,
    pub explanation: String,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<StaticData>,
    pub oracle: Arc<dyn Oracle>,
}

// ── Error helper ──────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("AI validation failed")]
    LaneValidationFailed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Oracle(_) => StatusCode::BAD_GATEWAY,
            ApiError::LaneValidationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        json_error(status, &self.to_string()).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(data: Arc<StaticData>, oracle: Arc<dyn Oracle>) -> Router {
    let state = AppState { data, oracle };

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/llms.txt", get(get_llms_txt))
        // Draft assistant
        .route("/api/analyze", post(analyze))
        .route("/api/validate-lane", post(validate_lane))
        // Static data
        .route("/api/heroes", get(list_heroes))
        .route("/api/heroes/{hero}/lanes", get(hero_lanes))
        .route("/api/lanes", get(list_lanes))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let endpoint = metrics::normalize_path(req.uri().path());
    let started = Instant::now();

    let response = next.run(req).await;

    metrics::API_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint.as_str()])
        .observe(started.elapsed().as_secs_f64());
    metrics::API_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), endpoint.as_str(), response.status().as_str()])
        .inc();
    response
}

// ── Draft handlers ────────────────────────────────────────────────────

async fn analyze(State(state): State<AppState>, Json(req): Json<AnalyzeRequest>) -> Response {
    if req.my_hero.trim().is_empty() {
        return ApiError::BadRequest("my_hero is required".to_string()).into_response();
    }
    let draft = DraftState::from_request(req);
    let prompt = prompt::draft_completion_prompt(&draft);

    let reply = match state.oracle.generate(&prompt).await {
        Ok(value) => decode_reply::<analysis::AnalysisReply>(value),
        Err(e) => Err(e),
    };

    match reply {
        Ok(reply) => {
            record_oracle_outcome("analyze", None);
            let response = analysis::complete_draft(reply, &draft, &state.data.registry);
            tracing::info!(
                "Completed draft for {}: {} of {} slots filled",
                draft.primary_hero,
                response.synergies.len(),
                draft.slots_left()
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            record_oracle_outcome("analyze", Some(&e));
            tracing::warn!("Oracle failed for draft of {}: {e}", draft.primary_hero);
            match &state.data.fallback {
                Some(fallback) => {
                    metrics::FALLBACK_SERVED_TOTAL.inc();
                    (StatusCode::OK, Json(fallback.clone())).into_response()
                }
                None => ApiError::Oracle(e).into_response(),
            }
        }
    }
}

async fn validate_lane(
    State(state): State<AppState>,
    Json(req): Json<ValidateLaneRequest>,
) -> Result<Json<Value>, ApiError> {
    let hero = normalize_hero(&req.hero);
    let prompt = prompt::lane_validation_prompt(&hero, &req.lane);

    let verdict = async {
        let value = state.oracle.generate(&prompt).await?;
        decode_reply::<LaneVerdict>(value.clone())?;
        Ok::<_, OracleError>(value)
    }
    .await;

    match verdict {
        Ok(value) => {
            record_oracle_outcome("validate_lane", None);
            Ok(Json(value))
        }
        Err(e) => {
            record_oracle_outcome("validate_lane", Some(&e));
            tracing::warn!("Lane validation failed for {hero} in {:?}: {e}", req.lane);
            Err(ApiError::LaneValidationFailed)
        }
    }
}

fn record_oracle_outcome(flow: &str, error: Option<&OracleError>) {
    let outcome = error.map_or("ok", OracleError::kind);
    metrics::ORACLE_CALLS_TOTAL
        .with_label_values(&[flow, outcome])
        .inc();
}

// ── Static data handlers ──────────────────────────────────────────────

async fn list_heroes(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .data
        .catalog
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Hero catalog not loaded".to_string()))
}

async fn hero_lanes(State(state): State<AppState>, Path(hero): Path<String>) -> Json<Value> {
    let hero = normalize_hero(&hero);
    let lanes = state.data.registry.lanes_for(&hero);
    Json(json!({ "hero": hero, "lanes": lanes }))
}

async fn list_lanes() -> Json<[Lane; TEAM_SIZE]> {
    Json(Lane::ALL)
}

// ── Service handlers ──────────────────────────────────────────────────

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "draft-assistant-backend",
        "registry_heroes": state.data.registry.len(),
        "catalog_loaded": state.data.catalog.is_some(),
        "fallback_loaded": state.data.fallback.is_some(),
    }))
}

async fn get_metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        metrics::gather_metrics(),
    )
        .into_response()
}

async fn get_llms_txt() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        crate::llms_txt::LLMS_TXT,
    )
        .into_response()
}
