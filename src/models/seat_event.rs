use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{inventory::SeatStatus, seat::SeatId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum SeatEventKind {
    HoldCreated,
    HoldExtended,
    HoldReleased,
    HoldExpired,
    Sold,
}

/// Запись журнала переходов статуса места.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SeatEvent {
    pub event_id: i64,
    pub seat_id: SeatId,
    pub kind: SeatEventKind,
    pub from_status: SeatStatus,
    pub to_status: SeatStatus,
    pub hold_id: Option<Uuid>,
    pub session_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl SeatEvent {
    pub fn new(
        event_id: i64,
        seat_id: SeatId,
        kind: SeatEventKind,
        from_status: SeatStatus,
        hold_id: Uuid,
        session_id: &str,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        let to_status = match kind {
            SeatEventKind::HoldCreated | SeatEventKind::HoldExtended => SeatStatus::Held,
            SeatEventKind::HoldReleased | SeatEventKind::HoldExpired => SeatStatus::Available,
            SeatEventKind::Sold => SeatStatus::Sold,
        };
        SeatEvent {
            event_id,
            seat_id,
            kind,
            from_status,
            to_status,
            hold_id: Some(hold_id),
            session_id: Some(session_id.to_string()),
            occurred_at,
        }
    }
}
