use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::SeatingConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::hold::merge_seat_ids;
use crate::models::{Hold, HoldGrant, HoldStatus, SeatClaim, SeatId};
use crate::storage::InventoryStore;

const MAX_SESSION_ID_LEN: usize = 128;

/// Менеджер hold-ов: гарантия не более одного владельца у места.
pub struct HoldService {
    store: Arc<dyn InventoryStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_seats: usize,
}

impl HoldService {
    pub fn new(store: Arc<dyn InventoryStore>, clock: Arc<dyn Clock>, config: &SeatingConfig) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::seconds(config.hold_ttl_seconds),
            max_seats: config.max_seats_per_hold,
        }
    }

    /// Захват мест сессией. Всё или ничего; уже свои места продлеваются до now + TTL.
    pub async fn create_or_extend_hold(
        &self,
        event_id: i64,
        session_id: &str,
        seat_ids: &[SeatId],
    ) -> EngineResult<HoldGrant> {
        let session_id = session_id.trim();
        if session_id.is_empty() || session_id.len() > MAX_SESSION_ID_LEN {
            return Err(EngineError::validation("session id is missing or too long"));
        }
        if seat_ids.is_empty() {
            return Err(EngineError::validation("seat_ids must not be empty"));
        }
        let seat_ids = merge_seat_ids(&[], seat_ids);
        if seat_ids.len() > self.max_seats {
            return Err(EngineError::validation(format!(
                "a hold may contain at most {} seats",
                self.max_seats
            )));
        }

        let now = self.clock.now();
        let claim = SeatClaim {
            event_id,
            session_id: session_id.to_string(),
            seat_ids,
            now,
            expires_at: now + self.ttl,
            max_seats: self.max_seats,
        };

        match self.store.claim(claim).await {
            Ok(hold) => {
                info!(
                    "Hold {} for session {} on event {}: {} seats until {}",
                    hold.id,
                    hold.session_id,
                    event_id,
                    hold.seat_ids.len(),
                    hold.expires_at
                );
                Ok(hold.grant())
            }
            Err(e) if e.is_contention() => {
                debug!("Session {} lost seats on event {}: {}", session_id, event_id, e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Освобождает hold целиком. Повторный вызов и вызов после истечения безопасны.
    pub async fn release_hold(&self, hold_id: Uuid) -> EngineResult<Hold> {
        let hold = self.store.release(hold_id, None, self.clock.now()).await?;
        info!("Hold {} released ({:?})", hold_id, hold.status);
        Ok(hold)
    }

    /// Снимает отдельные места с активного hold. Опустевший hold становится released.
    pub async fn release_seats(&self, hold_id: Uuid, seat_ids: &[SeatId]) -> EngineResult<Hold> {
        if seat_ids.is_empty() {
            return Err(EngineError::validation("seat_ids must not be empty"));
        }
        let hold = self.store.release(hold_id, Some(seat_ids), self.clock.now()).await?;
        debug!("Hold {} now has {} seats", hold_id, hold.seat_ids.len());
        Ok(hold)
    }

    /// Проход по просроченным hold. Возвращает число истёкших.
    pub async fn expire_stale_holds(&self) -> EngineResult<usize> {
        let expired = self.store.expire_stale(self.clock.now()).await?;
        if !expired.is_empty() {
            let seats: usize = expired.iter().map(|h| h.seat_ids.len()).sum();
            info!("Expired {} holds, {} seats back on sale", expired.len(), seats);
        }
        Ok(expired.len())
    }

    /// Hold с учётом ленивого истечения: active с вышедшим сроком отдаётся как expired.
    pub async fn get_hold(&self, hold_id: Uuid) -> EngineResult<Hold> {
        let mut hold = self
            .store
            .find_hold(hold_id)
            .await?
            .ok_or_else(|| EngineError::not_found("hold", hold_id))?;
        if hold.status == HoldStatus::Active && !hold.is_live(self.clock.now()) {
            hold.status = HoldStatus::Expired;
        }
        Ok(hold)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

