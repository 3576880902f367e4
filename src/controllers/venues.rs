use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{validated, ApiResult};
use crate::error::EngineError;
use crate::models::{SeatCategory, SeatKey, Zone};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venues", post(create_venue))
        .route("/venues/{venue_id}", get(get_venue))
        .route("/venues/{venue_id}/background", put(set_background))
        .route("/venues/{venue_id}/categories", post(upsert_category))
        .route("/venues/{venue_id}/categories/{category_id}", delete(delete_category))
        .route("/venues/{venue_id}/zones", post(add_zone))
        .route(
            "/venues/{venue_id}/zones/{zone_id}",
            put(update_zone).delete(delete_zone),
        )
        .route("/venues/{venue_id}/zones/{zone_id}/seats/override", put(set_seat_override))
        .route("/venues/{venue_id}/publish", post(publish))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(url)]
    pub background_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BackgroundRequest {
    #[validate(url)]
    pub background_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 32))]
    pub color: String,
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCategoryQuery {
    pub replacement: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SeatOverrideRequest {
    #[validate(length(min = 1, max = 16))]
    pub row_label: String,
    #[validate(range(min = 1))]
    pub number: u32,
    /// `null` снимает ручную цену.
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PublishRequest {
    #[validate(range(min = 1))]
    pub event_id: i64,
}

// POST /api/venues
async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVenueRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let venue = state.layouts.create_venue(&req.name, req.background_url).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "venue": venue }))))
}

// GET /api/venues/{venue_id}
async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let venue = state.layouts.get_venue(venue_id).await?;
    Ok(Json(json!({ "success": true, "venue": venue })))
}

// PUT /api/venues/{venue_id}/background
async fn set_background(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<Uuid>,
    Json(req): Json<BackgroundRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let venue = state.layouts.set_background(venue_id, req.background_url).await?;
    Ok(Json(json!({ "success": true, "venue": venue })))
}

// POST /api/venues/{venue_id}/categories
async fn upsert_category(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<Uuid>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let category = SeatCategory {
        id: req.id,
        name: req.name,
        color: req.color,
        price_cents: req.price_cents,
    };
    let venue = state.layouts.upsert_category(venue_id, category).await?;
    Ok(Json(json!({ "success": true, "venue": venue })))
}

// DELETE /api/venues/{venue_id}/categories/{category_id}?replacement=
async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path((venue_id, category_id)): Path<(Uuid, String)>,
    Query(query): Query<DeleteCategoryQuery>,
) -> ApiResult<impl IntoResponse> {
    let venue = state
        .layouts
        .delete_category(venue_id, &category_id, query.replacement.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "venue": venue })))
}

// POST /api/venues/{venue_id}/zones
async fn add_zone(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<Uuid>,
    Json(zone): Json<Zone>,
) -> ApiResult<impl IntoResponse> {
    let zone = validated(zone)?;
    let record = state.layouts.add_zone(venue_id, zone).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "zone": record }))))
}

// PUT /api/venues/{venue_id}/zones/{zone_id}
async fn update_zone(
    State(state): State<Arc<AppState>>,
    Path((venue_id, zone_id)): Path<(Uuid, String)>,
    Json(zone): Json<Zone>,
) -> ApiResult<impl IntoResponse> {
    if zone.id != zone_id {
        return Err(EngineError::validation("zone id in body does not match path").into());
    }
    let zone = validated(zone)?;
    let (record, report) = state.layouts.update_zone(venue_id, zone).await?;
    Ok(Json(json!({ "success": true, "zone": record, "regeneration": report })))
}

// DELETE /api/venues/{venue_id}/zones/{zone_id}
async fn delete_zone(
    State(state): State<Arc<AppState>>,
    Path((venue_id, zone_id)): Path<(Uuid, String)>,
) -> ApiResult<impl IntoResponse> {
    let venue = state.layouts.delete_zone(venue_id, &zone_id).await?;
    Ok(Json(json!({ "success": true, "venue": venue })))
}

// PUT /api/venues/{venue_id}/zones/{zone_id}/seats/override
async fn set_seat_override(
    State(state): State<Arc<AppState>>,
    Path((venue_id, zone_id)): Path<(Uuid, String)>,
    Json(req): Json<SeatOverrideRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let record = state
        .layouts
        .set_seat_override(venue_id, &zone_id, SeatKey::new(req.row_label, req.number), req.price_cents)
        .await?;
    Ok(Json(json!({ "success": true, "zone": record })))
}

// POST /api/venues/{venue_id}/publish
async fn publish(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<Uuid>,
    Json(req): Json<PublishRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(req)?;
    let seats = state.layouts.publish(venue_id, req.event_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "event_id": req.event_id, "seats": seats })),
    ))
}
