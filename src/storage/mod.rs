//! Хранилища движка рассадки.
//!
//! Атомарность захвата, освобождения и продажи мест обеспечивает само хранилище:
//! проверка статуса и запись происходят в одной транзакции (Postgres) или в одной
//! критической секции (in-memory). Сервисы поверх не держат собственных блокировок.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    Booking, BookingDraft, Hold, InventorySeat, SeatClaim, SeatEvent, SeatId,
    VenueLayout,
};

pub use memory::{MemoryInventoryStore, MemoryLayoutRepository};
pub use postgres::{PgInventoryStore, PgLayoutRepository};

/// Хранилище схем площадок. Запись с проверкой версии: один редактор за раз.
#[async_trait]
pub trait LayoutRepository: Send + Sync {
    async fn insert(&self, layout: &VenueLayout) -> EngineResult<()>;

    async fn find(&self, venue_id: Uuid) -> EngineResult<Option<VenueLayout>>;

    /// Сохраняет схему, если в хранилище всё ещё `expected_version`.
    async fn save(&self, layout: &VenueLayout, expected_version: i64) -> EngineResult<()>;
}

/// Инвентарь событий, hold-ы и продажи.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Разовое копирование мест схемы в инвентарь события.
    async fn publish(&self, event_id: i64, seats: Vec<InventorySeat>) -> EngineResult<usize>;

    async fn list_seats(&self, event_id: i64) -> EngineResult<Vec<InventorySeat>>;

    async fn find_seats(&self, event_id: i64, seat_ids: &[SeatId]) -> EngineResult<Vec<InventorySeat>>;

    async fn find_hold(&self, hold_id: Uuid) -> EngineResult<Option<Hold>>;

    /// Всё-или-ничего: либо все места переходят под hold сессии, либо `SeatUnavailable`.
    async fn claim(&self, claim: SeatClaim) -> EngineResult<Hold>;

    /// Освобождает места hold (все или перечисленные). Повторный вызов безопасен.
    async fn release(
        &self,
        hold_id: Uuid,
        seat_ids: Option<&[SeatId]>,
        now: DateTime<Utc>,
    ) -> EngineResult<Hold>;

    /// Переводит просроченные активные hold в expired и возвращает их места в продажу.
    async fn expire_stale(&self, now: DateTime<Utc>) -> EngineResult<Vec<Hold>>;

    /// Атомарная продажа мест hold. Повтор для committed hold возвращает ту же бронь.
    async fn commit(&self, draft: BookingDraft) -> EngineResult<Booking>;

    async fn find_booking_by_hold(&self, hold_id: Uuid) -> EngineResult<Option<Booking>>;

    async fn seat_events(&self, event_id: i64, limit: usize) -> EngineResult<Vec<SeatEvent>>;
}
