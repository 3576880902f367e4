use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{events::SeatIdsRequest, validated, ApiResult};
use crate::models::{BuyerContact, PaymentProof};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holds/{hold_id}", get(get_hold).delete(release_hold))
        .route("/holds/{hold_id}/release-seats", post(release_seats))
        .route("/holds/{hold_id}/commit", post(commit_hold))
        .route("/holds/{hold_id}/booking", get(get_booking))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommitRequest {
    #[validate(nested)]
    pub payment: PaymentProof,
    #[validate(nested)]
    pub buyer: BuyerContact,
}

// GET /api/holds/{hold_id}
async fn get_hold(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let hold = state.holds.get_hold(hold_id).await?;
    Ok(Json(json!({ "success": true, "hold": hold })))
}

// DELETE /api/holds/{hold_id}
async fn release_hold(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let hold = state.holds.release_hold(hold_id).await?;
    Ok(Json(json!({ "success": true, "hold": hold })))
}

// POST /api/holds/{hold_id}/release-seats
async fn release_seats(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
    Json(req): Json<SeatIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let hold = state.holds.release_seats(hold_id, &req.seat_ids).await?;
    Ok(Json(json!({ "success": true, "hold": hold })))
}

// POST /api/holds/{hold_id}/commit
async fn commit_hold(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
    Json(req): Json<CommitRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let booking = state.bookings.commit(hold_id, req.payment, req.buyer).await?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

// GET /api/holds/{hold_id}/booking
async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let booking = state.bookings.get_by_hold(hold_id).await?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}
