use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::seat::SeatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum HoldStatus {
    Active,
    Expired,
    Committed,
    Released,
}

/// Временная эксклюзивная блокировка набора мест одной сессией.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hold {
    pub id: Uuid,
    pub session_id: String,
    pub event_id: i64,
    pub seat_ids: Vec<SeatId>,
    pub status: HoldStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hold {
    /// Hold действует, только если он active и его срок ещё не вышел.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == HoldStatus::Active && self.expires_at > now
    }

    pub fn grant(&self) -> HoldGrant {
        HoldGrant {
            hold_id: self.id,
            event_id: self.event_id,
            seat_ids: self.seat_ids.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Ответ клиенту после успешного захвата: по expires_at рисуется обратный отсчёт.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldGrant {
    pub hold_id: Uuid,
    pub event_id: i64,
    pub seat_ids: Vec<SeatId>,
    pub expires_at: DateTime<Utc>,
}

/// Запрос к хранилищу на атомарный захват мест.
#[derive(Debug, Clone)]
pub struct SeatClaim {
    pub event_id: i64,
    pub session_id: String,
    pub seat_ids: Vec<SeatId>,
    pub now: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub max_seats: usize,
}

/// Объединение мест существующего hold и новых, без дублей, с сохранением порядка.
pub fn merge_seat_ids(existing: &[SeatId], requested: &[SeatId]) -> Vec<SeatId> {
    let mut merged = existing.to_vec();
    for id in requested {
        if !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn merge_keeps_order_and_drops_duplicates() {
        let a = SeatId::from_raw("a");
        let b = SeatId::from_raw("b");
        let c = SeatId::from_raw("c");
        let merged = merge_seat_ids(&[a.clone(), b.clone()], &[b.clone(), c.clone(), a.clone()]);
        assert_eq!(merged, vec![a, b, c]);
    }

    #[test]
    fn active_hold_past_expiry_is_not_live() {
        let now = Utc::now();
        let hold = Hold {
            id: Uuid::new_v4(),
            session_id: "s".into(),
            event_id: 1,
            seat_ids: vec![],
            status: HoldStatus::Active,
            created_at: now - Duration::minutes(11),
            expires_at: now - Duration::minutes(1),
            updated_at: now - Duration::minutes(11),
        };
        assert!(!hold.is_live(now));
        assert!(hold.is_live(now - Duration::minutes(2)));
    }
}
