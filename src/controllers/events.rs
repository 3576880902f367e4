use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::{validated, ApiResult};
use crate::middleware::SessionId;
use crate::models::{SeatId, SeatPreferences};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events/{event_id}/seat-map", get(get_seat_map))
        .route("/events/{event_id}/seats", get(get_seats))
        .route("/events/{event_id}/seats/status", post(get_seat_status))
        .route("/events/{event_id}/summary", get(get_summary))
        .route("/events/{event_id}/audit", get(get_audit))
        .route("/events/{event_id}/recommendations", post(recommend_seats))
        .route("/events/{event_id}/holds", post(create_or_extend_hold))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SeatIdsRequest {
    #[validate(length(min = 1, max = 500))]
    pub seat_ids: Vec<SeatId>,
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<usize>,
}

// GET /api/events/{event_id}/seat-map
async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let seats = state.inventory.seat_map(event_id).await?;
    Ok(Json(json!({ "success": true, "event_id": event_id, "seats": seats })))
}

// GET /api/events/{event_id}/seats
async fn get_seats(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let seats = state.inventory.get_all(event_id).await?;
    Ok(Json(json!({ "success": true, "event_id": event_id, "seats": seats })))
}

// POST /api/events/{event_id}/seats/status
async fn get_seat_status(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(req): Json<SeatIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let seats = state.inventory.get_status(event_id, &req.seat_ids).await?;
    Ok(Json(json!({ "success": true, "seats": seats })))
}

// GET /api/events/{event_id}/summary
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let summary = state.inventory.summary(event_id).await?;
    Ok(Json(json!({ "success": true, "summary": summary })))
}

// GET /api/events/{event_id}/audit?limit=
async fn get_audit(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<impl IntoResponse> {
    let events = state.inventory.audit(event_id, query.limit).await?;
    Ok(Json(json!({ "success": true, "events": events })))
}

// POST /api/events/{event_id}/recommendations
async fn recommend_seats(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(prefs): Json<SeatPreferences>,
) -> ApiResult<impl IntoResponse> {
    let prefs = validated(prefs)?;
    let set = state.inventory.recommend(event_id, &prefs).await?;
    Ok(Json(json!({ "success": true, "event_id": event_id, "recommendations": set })))
}

// POST /api/events/{event_id}/holds
async fn create_or_extend_hold(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    SessionId(session_id): SessionId,
    Json(req): Json<SeatIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let grant = state
        .holds
        .create_or_extend_hold(event_id, &session_id, &req.seat_ids)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "hold": grant }))))
}
