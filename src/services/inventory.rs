use std::sync::Arc;
use tracing::debug;

use crate::cache::CacheService;
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::recommendation::best_available;
use crate::models::{
    AvailabilitySummary, RecommendationSet, SeatEvent, SeatId, SeatMapEntry, SeatPreferences,
    SeatStatus, SeatStatusView, SeatView,
};
use crate::storage::InventoryStore;

pub const DEFAULT_AUDIT_LIMIT: usize = 200;
pub const MAX_AUDIT_LIMIT: usize = 5000;

/// Чтение инвентаря. Статус всегда вычисляется относительно `now`,
/// поэтому просроченный hold виден как свободное место ещё до прохода sweeper.
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    cache: CacheService,
    clock: Arc<dyn Clock>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>, cache: CacheService, clock: Arc<dyn Clock>) -> Self {
        Self { store, cache, clock }
    }

    pub async fn get_all(&self, event_id: i64) -> EngineResult<Vec<SeatView>> {
        let now = self.clock.now();
        let seats = self.store.list_seats(event_id).await?;
        Ok(seats.iter().map(|s| s.view(now)).collect())
    }

    pub async fn get_status(
        &self,
        event_id: i64,
        seat_ids: &[SeatId],
    ) -> EngineResult<Vec<SeatStatusView>> {
        if seat_ids.is_empty() {
            return Err(EngineError::validation("seat_ids must not be empty"));
        }
        let now = self.clock.now();
        let seats = self.store.find_seats(event_id, seat_ids).await?;
        Ok(seats
            .into_iter()
            .map(|s| SeatStatusView { status: s.effective_status(now), seat_id: s.seat_id })
            .collect())
    }

    pub async fn summary(&self, event_id: i64) -> EngineResult<AvailabilitySummary> {
        let now = self.clock.now();
        let seats = self.store.list_seats(event_id).await?;
        let mut summary = AvailabilitySummary {
            event_id,
            total_seats: seats.len(),
            ..Default::default()
        };
        for seat in &seats {
            match seat.effective_status(now) {
                SeatStatus::Available => summary.available_seats += 1,
                SeatStatus::Held => summary.held_seats += 1,
                SeatStatus::Sold => {
                    summary.sold_seats += 1;
                    summary.sold_revenue_cents += seat.price_cents;
                }
            }
        }
        Ok(summary)
    }

    /// Геометрия события: сначала кеш, затем хранилище с записью в кеш.
    pub async fn seat_map(&self, event_id: i64) -> EngineResult<Vec<SeatMapEntry>> {
        if let Some(entries) = self.cache.get_seat_map(event_id).await {
            return Ok(entries);
        }
        let seats = self.store.list_seats(event_id).await?;
        let entries: Vec<SeatMapEntry> = seats.iter().map(SeatMapEntry::from).collect();
        debug!("Seat map for event {} loaded from store ({} seats)", event_id, entries.len());
        self.cache.save_seat_map(event_id, &entries).await;
        Ok(entries)
    }

    /// Подбор свободных мест по количеству, цене и зонам. Только чтение, ничего не держит.
    pub async fn recommend(
        &self,
        event_id: i64,
        prefs: &SeatPreferences,
    ) -> EngineResult<RecommendationSet> {
        if prefs.quantity == 0 {
            return Err(EngineError::validation("quantity must be positive"));
        }
        if let (Some(min), Some(max)) = (prefs.min_price_cents, prefs.max_price_cents) {
            if min > max {
                return Err(EngineError::validation("min_price_cents exceeds max_price_cents"));
            }
        }
        let seats = self.store.list_seats(event_id).await?;
        let set = best_available(&seats, prefs, self.clock.now());
        debug!(
            "Event {}: {} recommendation options for {} seats",
            event_id, set.total_options_found, prefs.quantity
        );
        Ok(set)
    }

    pub async fn audit(&self, event_id: i64, limit: Option<usize>) -> EngineResult<Vec<SeatEvent>> {
        let limit = limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, MAX_AUDIT_LIMIT);
        self.store.seat_events(event_id, limit).await
    }
}
