use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::seat::SeatId;
use super::seat_event::{SeatEvent, SeatEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Held,
    Sold,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Held => "held",
            SeatStatus::Sold => "sold",
        }
    }
}

/// Место в инвентаре конкретного события. Снимок схемы на момент публикации.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct InventorySeat {
    pub event_id: i64,
    pub seat_id: SeatId,
    pub zone_id: String,
    pub row_label: String,
    pub number: i32,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub category_id: Option<String>,
    pub price_cents: i64,
    pub status: SeatStatus,
    pub hold_id: Option<Uuid>,
    pub held_by: Option<String>,
    pub held_until: Option<DateTime<Utc>>,
    pub booking_id: Option<Uuid>,
}

impl InventorySeat {
    /// Статус с учётом ленивого истечения: просроченный hold читается как available.
    pub fn effective_status(&self, now: DateTime<Utc>) -> SeatStatus {
        match self.status {
            SeatStatus::Held if self.hold_lapsed(now) => SeatStatus::Available,
            status => status,
        }
    }

    pub fn hold_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == SeatStatus::Held && self.held_until.map_or(true, |until| until <= now)
    }

    /// Может ли сессия взять место под свой hold прямо сейчас.
    pub fn claimable_by(&self, hold_id: Option<Uuid>, now: DateTime<Utc>) -> bool {
        match self.status {
            SeatStatus::Available => true,
            SeatStatus::Sold => false,
            SeatStatus::Held => {
                self.hold_lapsed(now) || (hold_id.is_some() && self.hold_id == hold_id)
            }
        }
    }

    pub fn make_available(&mut self) {
        self.status = SeatStatus::Available;
        self.hold_id = None;
        self.held_by = None;
        self.held_until = None;
    }

    /// Запись журнала об истечении чужого hold, если место забирают из-под него.
    pub fn lapsed_hold_event(&self, now: DateTime<Utc>) -> Option<SeatEvent> {
        if !self.hold_lapsed(now) {
            return None;
        }
        let hold_id = self.hold_id?;
        Some(SeatEvent::new(
            self.event_id,
            self.seat_id.clone(),
            SeatEventKind::HoldExpired,
            SeatStatus::Held,
            hold_id,
            self.held_by.as_deref().unwrap_or_default(),
            now,
        ))
    }

    pub fn view(&self, now: DateTime<Utc>) -> SeatView {
        let status = self.effective_status(now);
        SeatView {
            seat_id: self.seat_id.clone(),
            zone_id: self.zone_id.clone(),
            label: self.label.clone(),
            x: self.x,
            y: self.y,
            category_id: self.category_id.clone(),
            price_cents: self.price_cents,
            status,
            hold_expires_at: match status {
                SeatStatus::Held => self.held_until,
                _ => None,
            },
        }
    }
}

/// То, что видит слой отрисовки.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat_id: SeatId,
    pub zone_id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub category_id: Option<String>,
    pub price_cents: i64,
    pub status: SeatStatus,
    pub hold_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatStatusView {
    pub seat_id: SeatId,
    pub status: SeatStatus,
}

/// Неизменяемая после публикации геометрия события (кешируется).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatMapEntry {
    pub seat_id: SeatId,
    pub zone_id: String,
    pub row_label: String,
    pub number: i32,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub category_id: Option<String>,
    pub price_cents: i64,
}

impl From<&InventorySeat> for SeatMapEntry {
    fn from(seat: &InventorySeat) -> Self {
        SeatMapEntry {
            seat_id: seat.seat_id.clone(),
            zone_id: seat.zone_id.clone(),
            row_label: seat.row_label.clone(),
            number: seat.number,
            label: seat.label.clone(),
            x: seat.x,
            y: seat.y,
            category_id: seat.category_id.clone(),
            price_cents: seat.price_cents,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySummary {
    pub event_id: i64,
    pub total_seats: usize,
    pub available_seats: usize,
    pub held_seats: usize,
    pub sold_seats: usize,
    pub sold_revenue_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn held_seat(until: DateTime<Utc>, hold_id: Uuid) -> InventorySeat {
        InventorySeat {
            event_id: 1,
            seat_id: SeatId::from_raw("z-A-1"),
            zone_id: "z".into(),
            row_label: "A".into(),
            number: 1,
            label: "A1".into(),
            x: 0.0,
            y: 0.0,
            category_id: None,
            price_cents: 1000,
            status: SeatStatus::Held,
            hold_id: Some(hold_id),
            held_by: Some("s1".into()),
            held_until: Some(until),
            booking_id: None,
        }
    }

    #[test]
    fn lapsed_hold_reads_as_available() {
        let now = Utc::now();
        let seat = held_seat(now - Duration::seconds(1), Uuid::new_v4());
        assert_eq!(seat.effective_status(now), SeatStatus::Available);
        assert_eq!(seat.view(now).hold_expires_at, None);
    }

    #[test]
    fn expiry_instant_counts_as_lapsed() {
        let now = Utc::now();
        let seat = held_seat(now, Uuid::new_v4());
        assert_eq!(seat.effective_status(now), SeatStatus::Available);
    }

    #[test]
    fn live_hold_is_claimable_only_by_owner() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let seat = held_seat(now + Duration::minutes(5), owner);
        assert_eq!(seat.effective_status(now), SeatStatus::Held);
        assert!(seat.claimable_by(Some(owner), now));
        assert!(!seat.claimable_by(Some(Uuid::new_v4()), now));
        assert!(!seat.claimable_by(None, now));
    }

    #[test]
    fn lapsed_hold_leaves_an_expiry_record() {
        let now = Utc::now();
        let old = Uuid::new_v4();
        let record = held_seat(now - Duration::seconds(5), old)
            .lapsed_hold_event(now)
            .expect("lapsed seat yields a record");
        assert_eq!(record.kind, SeatEventKind::HoldExpired);
        assert_eq!(record.hold_id, Some(old));
        assert_eq!(record.session_id.as_deref(), Some("s1"));
        assert_eq!(record.to_status, SeatStatus::Available);

        assert!(held_seat(now + Duration::minutes(1), old).lapsed_hold_event(now).is_none());
    }

    #[test]
    fn sold_is_terminal() {
        let now = Utc::now();
        let mut seat = held_seat(now - Duration::minutes(1), Uuid::new_v4());
        seat.status = SeatStatus::Sold;
        assert_eq!(seat.effective_status(now), SeatStatus::Sold);
        assert!(!seat.claimable_by(seat.hold_id, now));
    }
}
