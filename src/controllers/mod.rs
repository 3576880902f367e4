pub mod events;
pub mod holds;
pub mod venues;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::EngineError;
use crate::models::SeatId;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(holds::routes())
        .merge(venues::routes())
}

// --- Ошибки API ---
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seat_ids: Option<Vec<SeatId>>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match &e {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::SeatUnavailable { .. } | EngineError::Conflict(_) => StatusCode::CONFLICT,
            EngineError::HoldExpired { .. } => StatusCode::GONE,
            EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", e);
        }
        let seat_ids = match &e {
            EngineError::SeatUnavailable { seat_ids } => Some(seat_ids.clone()),
            _ => None,
        };
        ApiError {
            status,
            success: false,
            code: e.code(),
            // Детали хранилища наружу не отдаём
            message: match &e {
                EngineError::Storage(_) => "internal storage error".to_string(),
                other => other.to_string(),
            },
            seat_ids,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Проверка DTO через validator до передачи в сервис.
pub(crate) fn validated<T: Validate>(payload: T) -> ApiResult<T> {
    payload.validate().map_err(EngineError::from)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Zone;
    use uuid::Uuid;

    #[test]
    fn engine_errors_map_to_statuses() {
        let cases = [
            (EngineError::validation("bad"), StatusCode::BAD_REQUEST),
            (EngineError::not_found("hold", 1), StatusCode::NOT_FOUND),
            (EngineError::SeatUnavailable { seat_ids: vec![] }, StatusCode::CONFLICT),
            (EngineError::HoldExpired { hold_id: Uuid::new_v4() }, StatusCode::GONE),
            (EngineError::conflict("in use"), StatusCode::CONFLICT),
            (EngineError::Storage("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }

    #[test]
    fn unavailable_body_lists_seats() {
        let api = ApiError::from(EngineError::SeatUnavailable {
            seat_ids: vec![SeatId::from_raw("main-A-2")],
        });
        let body = serde_json::to_value(&api).unwrap();
        assert_eq!(body["code"], "seat_unavailable");
        assert_eq!(body["success"], false);
        assert_eq!(body["seat_ids"][0], "main-A-2");
    }

    #[test]
    fn zone_body_bounds_are_checked() {
        let zone: Zone = serde_json::from_value(serde_json::json!({
            "id": "main",
            "shape": "rect",
            "x": 0.0,
            "y": 0.0,
            "width": 200.0,
            "height": 200.0,
            "rows": 200000,
            "cols": 200000
        }))
        .unwrap();
        let err = validated(zone.clone()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let mut ok = zone;
        ok.rows = 10;
        ok.cols = 10;
        assert!(validated(ok).is_ok());
    }

    #[test]
    fn storage_details_are_hidden() {
        let api = ApiError::from(EngineError::Storage("password=secret".into()));
        assert_eq!(api.message, "internal storage error");
    }
}
