//! In-memory хранилища. Каждая операция целиком выполняется под одной блокировкой,
//! это и есть её транзакция.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use super::{InventoryStore, LayoutRepository};
use crate::error::{EngineError, EngineResult};
use crate::models::hold::merge_seat_ids;
use crate::models::{
    Booking, BookingDraft, Hold, HoldStatus, InventorySeat, SeatClaim, SeatEvent, SeatEventKind,
    SeatId, SeatStatus, VenueLayout,
};

#[derive(Default)]
pub struct MemoryLayoutRepository {
    layouts: Mutex<HashMap<Uuid, VenueLayout>>,
}

impl MemoryLayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LayoutRepository for MemoryLayoutRepository {
    async fn insert(&self, layout: &VenueLayout) -> EngineResult<()> {
        let mut layouts = self.layouts.lock();
        if layouts.contains_key(&layout.venue_id) {
            return Err(EngineError::conflict(format!("venue {} already exists", layout.venue_id)));
        }
        layouts.insert(layout.venue_id, layout.clone());
        Ok(())
    }

    async fn find(&self, venue_id: Uuid) -> EngineResult<Option<VenueLayout>> {
        Ok(self.layouts.lock().get(&venue_id).cloned())
    }

    async fn save(&self, layout: &VenueLayout, expected_version: i64) -> EngineResult<()> {
        let mut layouts = self.layouts.lock();
        let stored = layouts
            .get_mut(&layout.venue_id)
            .ok_or_else(|| EngineError::not_found("venue", layout.venue_id))?;
        if stored.version != expected_version {
            return Err(EngineError::conflict(format!(
                "venue {} was modified concurrently (version {} != {})",
                layout.venue_id, stored.version, expected_version
            )));
        }
        *stored = layout.clone();
        Ok(())
    }
}

/// Места одного события в порядке публикации плюс индекс по id.
#[derive(Default)]
struct EventSeats {
    seats: Vec<InventorySeat>,
    index: HashMap<SeatId, usize>,
}

impl EventSeats {
    fn get(&self, id: &SeatId) -> Option<&InventorySeat> {
        self.index.get(id).map(|&i| &self.seats[i])
    }

    fn get_mut(&mut self, id: &SeatId) -> Option<&mut InventorySeat> {
        match self.index.get(id) {
            Some(&i) => self.seats.get_mut(i),
            None => None,
        }
    }
}

#[derive(Default)]
struct InventoryState {
    events: HashMap<i64, EventSeats>,
    holds: HashMap<Uuid, Hold>,
    // hold_id -> booking
    bookings: HashMap<Uuid, Booking>,
    journal: Vec<SeatEvent>,
}

#[derive(Default)]
pub struct MemoryInventoryStore {
    state: Mutex<InventoryState>,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Возвращает в продажу места, которые всё ещё принадлежат hold.
fn free_hold_seats(
    hold: &Hold,
    seat_ids: &[SeatId],
    event: Option<&mut EventSeats>,
    journal: &mut Vec<SeatEvent>,
    kind: SeatEventKind,
    now: DateTime<Utc>,
) {
    let Some(event) = event else { return };
    for id in seat_ids {
        if let Some(seat) = event.get_mut(id) {
            if seat.status == SeatStatus::Held && seat.hold_id == Some(hold.id) {
                seat.make_available();
                journal.push(SeatEvent::new(
                    hold.event_id,
                    id.clone(),
                    kind,
                    SeatStatus::Held,
                    hold.id,
                    &hold.session_id,
                    now,
                ));
            }
        }
    }
}

fn expire_hold(state: &mut InventoryState, hold_id: Uuid, now: DateTime<Utc>) -> Option<Hold> {
    let hold = state.holds.get_mut(&hold_id)?;
    hold.status = HoldStatus::Expired;
    hold.updated_at = now;
    let hold = hold.clone();
    free_hold_seats(
        &hold,
        &hold.seat_ids,
        state.events.get_mut(&hold.event_id),
        &mut state.journal,
        SeatEventKind::HoldExpired,
        now,
    );
    Some(hold)
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn publish(&self, event_id: i64, seats: Vec<InventorySeat>) -> EngineResult<usize> {
        let mut state = self.state.lock();
        if state.events.contains_key(&event_id) {
            return Err(EngineError::conflict(format!("event {} is already published", event_id)));
        }
        let mut event = EventSeats::default();
        for seat in seats {
            if event.index.contains_key(&seat.seat_id) {
                return Err(EngineError::validation(format!("duplicate seat id {}", seat.seat_id)));
            }
            event.index.insert(seat.seat_id.clone(), event.seats.len());
            event.seats.push(seat);
        }
        let count = event.seats.len();
        state.events.insert(event_id, event);
        Ok(count)
    }

    async fn list_seats(&self, event_id: i64) -> EngineResult<Vec<InventorySeat>> {
        let state = self.state.lock();
        let event = state
            .events
            .get(&event_id)
            .ok_or_else(|| EngineError::not_found("event", event_id))?;
        Ok(event.seats.clone())
    }

    async fn find_seats(&self, event_id: i64, seat_ids: &[SeatId]) -> EngineResult<Vec<InventorySeat>> {
        let state = self.state.lock();
        let event = state
            .events
            .get(&event_id)
            .ok_or_else(|| EngineError::not_found("event", event_id))?;
        seat_ids
            .iter()
            .map(|id| event.get(id).cloned().ok_or_else(|| EngineError::not_found("seat", id)))
            .collect()
    }

    async fn find_hold(&self, hold_id: Uuid) -> EngineResult<Option<Hold>> {
        Ok(self.state.lock().holds.get(&hold_id).cloned())
    }

    async fn claim(&self, claim: SeatClaim) -> EngineResult<Hold> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = claim.now;

        {
            let event = state
                .events
                .get(&claim.event_id)
                .ok_or_else(|| EngineError::not_found("event", claim.event_id))?;
            if let Some(missing) = claim.seat_ids.iter().find(|id| event.get(id).is_none()) {
                return Err(EngineError::not_found("seat", missing));
            }
        }

        // Текущий hold сессии по событию; просроченный сначала закрываем.
        let existing = state
            .holds
            .values()
            .find(|h| {
                h.event_id == claim.event_id
                    && h.session_id == claim.session_id
                    && h.status == HoldStatus::Active
            })
            .map(|h| (h.id, h.is_live(now)));
        let live_id = match existing {
            Some((id, true)) => Some(id),
            Some((id, false)) => {
                expire_hold(state, id, now);
                None
            }
            None => None,
        };

        let InventoryState { events, holds, journal, .. } = state;
        let event = events
            .get_mut(&claim.event_id)
            .ok_or_else(|| EngineError::not_found("event", claim.event_id))?;

        let unavailable: Vec<SeatId> = claim
            .seat_ids
            .iter()
            .filter(|id| !event.get(id).is_some_and(|s| s.claimable_by(live_id, now)))
            .cloned()
            .collect();
        if !unavailable.is_empty() {
            return Err(EngineError::SeatUnavailable { seat_ids: unavailable });
        }

        let owned = live_id
            .and_then(|id| holds.get(&id))
            .map(|h| h.seat_ids.clone())
            .unwrap_or_default();
        let merged = merge_seat_ids(&owned, &claim.seat_ids);
        if merged.len() > claim.max_seats {
            return Err(EngineError::validation(format!(
                "a hold may contain at most {} seats",
                claim.max_seats
            )));
        }

        let hold = match live_id.and_then(|id| holds.get_mut(&id)) {
            Some(hold) => {
                hold.seat_ids = merged.clone();
                hold.expires_at = claim.expires_at;
                hold.updated_at = now;
                hold.clone()
            }
            None => {
                let hold = Hold {
                    id: Uuid::new_v4(),
                    session_id: claim.session_id.clone(),
                    event_id: claim.event_id,
                    seat_ids: merged.clone(),
                    status: HoldStatus::Active,
                    created_at: now,
                    expires_at: claim.expires_at,
                    updated_at: now,
                };
                holds.insert(hold.id, hold.clone());
                hold
            }
        };

        for id in &merged {
            if let Some(seat) = event.get_mut(id) {
                journal.extend(seat.lapsed_hold_event(now));
                let extended = seat.status == SeatStatus::Held && seat.hold_id == Some(hold.id);
                let from = seat.effective_status(now);
                seat.status = SeatStatus::Held;
                seat.hold_id = Some(hold.id);
                seat.held_by = Some(hold.session_id.clone());
                seat.held_until = Some(hold.expires_at);
                let kind = if extended { SeatEventKind::HoldExtended } else { SeatEventKind::HoldCreated };
                let from = if extended { SeatStatus::Held } else { from };
                journal.push(SeatEvent::new(
                    hold.event_id,
                    id.clone(),
                    kind,
                    from,
                    hold.id,
                    &hold.session_id,
                    now,
                ));
            }
        }
        Ok(hold)
    }

    async fn release(
        &self,
        hold_id: Uuid,
        seat_ids: Option<&[SeatId]>,
        now: DateTime<Utc>,
    ) -> EngineResult<Hold> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let hold = state
            .holds
            .get_mut(&hold_id)
            .ok_or_else(|| EngineError::not_found("hold", hold_id))?;

        match hold.status {
            HoldStatus::Committed => {
                return Err(EngineError::conflict(format!("hold {} is already committed", hold_id)))
            }
            HoldStatus::Released | HoldStatus::Expired => return Ok(hold.clone()),
            HoldStatus::Active => {}
        }

        let targets: Vec<SeatId> = match seat_ids {
            Some(ids) => hold.seat_ids.iter().filter(|id| ids.contains(id)).cloned().collect(),
            None => hold.seat_ids.clone(),
        };
        hold.seat_ids.retain(|id| !targets.contains(id));
        if hold.seat_ids.is_empty() {
            hold.status = HoldStatus::Released;
        }
        hold.updated_at = now;
        let snapshot = hold.clone();

        free_hold_seats(
            &snapshot,
            &targets,
            state.events.get_mut(&snapshot.event_id),
            &mut state.journal,
            SeatEventKind::HoldReleased,
            now,
        );
        Ok(snapshot)
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> EngineResult<Vec<Hold>> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let stale: Vec<Uuid> = state
            .holds
            .values()
            .filter(|h| h.status == HoldStatus::Active && h.expires_at <= now)
            .map(|h| h.id)
            .collect();
        Ok(stale
            .into_iter()
            .filter_map(|id| expire_hold(state, id, now))
            .collect())
    }

    async fn commit(&self, draft: BookingDraft) -> EngineResult<Booking> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = draft.now;
        let hold = state
            .holds
            .get(&draft.hold_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("hold", draft.hold_id))?;

        match hold.status {
            HoldStatus::Committed => {
                return state.bookings.get(&hold.id).cloned().ok_or_else(|| {
                    EngineError::Storage(format!("committed hold {} has no booking", hold.id))
                })
            }
            HoldStatus::Released => {
                return Err(EngineError::conflict(format!("hold {} was released", hold.id)))
            }
            HoldStatus::Expired => return Err(EngineError::HoldExpired { hold_id: hold.id }),
            HoldStatus::Active if !hold.is_live(now) => {
                expire_hold(state, hold.id, now);
                return Err(EngineError::HoldExpired { hold_id: hold.id });
            }
            HoldStatus::Active => {}
        }

        let event = state
            .events
            .get_mut(&hold.event_id)
            .ok_or_else(|| EngineError::not_found("event", hold.event_id))?;

        // Сначала проверка всех мест, потом запись: частичной продажи не бывает.
        let mut amount_cents = 0i64;
        for id in &hold.seat_ids {
            match event.get(id) {
                Some(seat) if seat.status == SeatStatus::Held && seat.hold_id == Some(hold.id) => {
                    amount_cents += seat.price_cents;
                }
                _ => {
                    return Err(EngineError::Storage(format!(
                        "seat {} is no longer owned by hold {}",
                        id, hold.id
                    )))
                }
            }
        }

        let booking = Booking {
            id: draft.booking_id,
            event_id: hold.event_id,
            hold_id: hold.id,
            session_id: hold.session_id.clone(),
            seat_ids: hold.seat_ids.clone(),
            buyer: draft.buyer,
            amount_cents,
            payment_reference: draft.payment_reference,
            payment_fingerprint: draft.payment_fingerprint,
            created_at: now,
        };

        for id in &hold.seat_ids {
            if let Some(seat) = event.get_mut(id) {
                seat.status = SeatStatus::Sold;
                seat.hold_id = None;
                seat.held_by = None;
                seat.held_until = None;
                seat.booking_id = Some(booking.id);
                state.journal.push(SeatEvent::new(
                    hold.event_id,
                    id.clone(),
                    SeatEventKind::Sold,
                    SeatStatus::Held,
                    hold.id,
                    &hold.session_id,
                    now,
                ));
            }
        }
        if let Some(stored) = state.holds.get_mut(&hold.id) {
            stored.status = HoldStatus::Committed;
            stored.updated_at = now;
        }
        state.bookings.insert(hold.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking_by_hold(&self, hold_id: Uuid) -> EngineResult<Option<Booking>> {
        Ok(self.state.lock().bookings.get(&hold_id).cloned())
    }

    async fn seat_events(&self, event_id: i64, limit: usize) -> EngineResult<Vec<SeatEvent>> {
        let state = self.state.lock();
        let mut events: Vec<SeatEvent> = state
            .journal
            .iter()
            .rev()
            .filter(|e| e.event_id == event_id)
            .take(limit)
            .cloned()
            .collect();
        events.reverse();
        Ok(events)
    }
}
