//! Postgres-хранилища.
//!
//! Порядок блокировок везде один: сначала строка hold, затем места события
//! по возрастанию seat_id. Так параллельные захваты не встают в дедлок.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::warn;
use uuid::Uuid;

use super::{InventoryStore, LayoutRepository};
use crate::error::{EngineError, EngineResult};
use crate::models::hold::merge_seat_ids;
use crate::models::{
    Booking, BookingDraft, BuyerContact, Hold, HoldStatus, InventorySeat, SeatClaim, SeatEvent,
    SeatEventKind, SeatId, SeatStatus, VenueLayout,
};

// 16 колонок на место, лимит bind-параметров Postgres 65535
const PUBLISH_CHUNK: usize = 2000;
const EXPIRE_BATCH: i64 = 500;

pub struct PgLayoutRepository {
    pool: PgPool,
}

impl PgLayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LayoutRepository for PgLayoutRepository {
    async fn insert(&self, layout: &VenueLayout) -> EngineResult<()> {
        let result = sqlx::query(
            "INSERT INTO venue_layouts (venue_id, name, version, document, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (venue_id) DO NOTHING",
        )
        .bind(layout.venue_id)
        .bind(&layout.name)
        .bind(layout.version)
        .bind(Json(layout))
        .bind(layout.created_at)
        .bind(layout.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::conflict(format!("venue {} already exists", layout.venue_id)));
        }
        Ok(())
    }

    async fn find(&self, venue_id: Uuid) -> EngineResult<Option<VenueLayout>> {
        let document: Option<Json<VenueLayout>> =
            sqlx::query_scalar("SELECT document FROM venue_layouts WHERE venue_id = $1")
                .bind(venue_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(document.map(|Json(layout)| layout))
    }

    async fn save(&self, layout: &VenueLayout, expected_version: i64) -> EngineResult<()> {
        let result = sqlx::query(
            "UPDATE venue_layouts
             SET name = $2, version = $3, document = $4, updated_at = $5
             WHERE venue_id = $1 AND version = $6",
        )
        .bind(layout.venue_id)
        .bind(&layout.name)
        .bind(layout.version)
        .bind(Json(layout))
        .bind(layout.updated_at)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM venue_layouts WHERE venue_id = $1)")
                .bind(layout.venue_id)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            Err(EngineError::conflict(format!(
                "venue {} was modified concurrently (expected version {})",
                layout.venue_id, expected_version
            )))
        } else {
            Err(EngineError::not_found("venue", layout.venue_id))
        }
    }
}

#[derive(FromRow)]
struct HoldRow {
    id: Uuid,
    session_id: String,
    event_id: i64,
    seat_ids: Vec<String>,
    status: HoldStatus,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<HoldRow> for Hold {
    fn from(row: HoldRow) -> Self {
        Hold {
            id: row.id,
            session_id: row.session_id,
            event_id: row.event_id,
            seat_ids: row.seat_ids.into_iter().map(SeatId::from_raw).collect(),
            status: row.status,
            created_at: row.created_at,
            expires_at: row.expires_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct BookingRow {
    id: Uuid,
    event_id: i64,
    hold_id: Uuid,
    session_id: String,
    seat_ids: Vec<String>,
    buyer: Json<BuyerContact>,
    amount_cents: i64,
    payment_reference: String,
    payment_fingerprint: String,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            event_id: row.event_id,
            hold_id: row.hold_id,
            session_id: row.session_id,
            seat_ids: row.seat_ids.into_iter().map(SeatId::from_raw).collect(),
            buyer: row.buyer.0,
            amount_cents: row.amount_cents,
            payment_reference: row.payment_reference,
            payment_fingerprint: row.payment_fingerprint,
            created_at: row.created_at,
        }
    }
}

fn raw_ids(ids: &[SeatId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_string()).collect()
}

async fn event_exists(conn: &mut PgConnection, event_id: i64) -> EngineResult<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM inventory_seats WHERE event_id = $1)")
            .bind(event_id)
            .fetch_one(conn)
            .await?;
    Ok(exists)
}

async fn lock_hold(conn: &mut PgConnection, hold_id: Uuid) -> EngineResult<Option<Hold>> {
    let row: Option<HoldRow> = sqlx::query_as(
        "SELECT id, session_id, event_id, seat_ids, status, created_at, expires_at, updated_at
         FROM seat_holds WHERE id = $1 FOR UPDATE",
    )
    .bind(hold_id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Hold::from))
}

async fn lock_session_hold(
    conn: &mut PgConnection,
    event_id: i64,
    session_id: &str,
) -> EngineResult<Option<Hold>> {
    let row: Option<HoldRow> = sqlx::query_as(
        "SELECT id, session_id, event_id, seat_ids, status, created_at, expires_at, updated_at
         FROM seat_holds
         WHERE event_id = $1 AND session_id = $2 AND status = 'active'
         FOR UPDATE",
    )
    .bind(event_id)
    .bind(session_id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Hold::from))
}

/// Блокирует места события в порядке seat_id.
async fn lock_seats(
    conn: &mut PgConnection,
    event_id: i64,
    seat_ids: &[SeatId],
) -> EngineResult<Vec<InventorySeat>> {
    let seats = sqlx::query_as::<_, InventorySeat>(
        "SELECT * FROM inventory_seats
         WHERE event_id = $1 AND seat_id = ANY($2)
         ORDER BY seat_id
         FOR UPDATE",
    )
    .bind(event_id)
    .bind(raw_ids(seat_ids))
    .fetch_all(conn)
    .await?;
    Ok(seats)
}

async fn record_events(conn: &mut PgConnection, events: &[SeatEvent]) -> EngineResult<()> {
    if events.is_empty() {
        return Ok(());
    }
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO seat_events (event_id, seat_id, kind, from_status, to_status, hold_id, session_id, occurred_at) ",
    );
    builder.push_values(events, |mut b, e| {
        b.push_bind(e.event_id)
            .push_bind(e.seat_id.as_str().to_string())
            .push_bind(e.kind)
            .push_bind(e.from_status)
            .push_bind(e.to_status)
            .push_bind(e.hold_id)
            .push_bind(e.session_id.clone())
            .push_bind(e.occurred_at);
    });
    builder.build().execute(conn).await?;
    Ok(())
}

/// Снимает с hold места, которые ему ещё принадлежат, и пишет журнал.
async fn free_seats(
    conn: &mut PgConnection,
    hold: &Hold,
    seat_ids: &[SeatId],
    kind: SeatEventKind,
    now: DateTime<Utc>,
) -> EngineResult<()> {
    if seat_ids.is_empty() {
        return Ok(());
    }
    lock_seats(&mut *conn, hold.event_id, seat_ids).await?;
    let freed: Vec<SeatId> = sqlx::query_scalar(
        "UPDATE inventory_seats
         SET status = 'available', hold_id = NULL, held_by = NULL, held_until = NULL
         WHERE event_id = $1 AND seat_id = ANY($2) AND status = 'held' AND hold_id = $3
         RETURNING seat_id",
    )
    .bind(hold.event_id)
    .bind(raw_ids(seat_ids))
    .bind(hold.id)
    .fetch_all(&mut *conn)
    .await?;

    let events: Vec<SeatEvent> = freed
        .into_iter()
        .map(|id| {
            SeatEvent::new(hold.event_id, id, kind, SeatStatus::Held, hold.id, &hold.session_id, now)
        })
        .collect();
    record_events(conn, &events).await
}

async fn set_hold_state(
    conn: &mut PgConnection,
    hold: &Hold,
) -> EngineResult<()> {
    sqlx::query(
        "UPDATE seat_holds SET seat_ids = $2, status = $3, expires_at = $4, updated_at = $5 WHERE id = $1",
    )
    .bind(hold.id)
    .bind(raw_ids(&hold.seat_ids))
    .bind(hold.status)
    .bind(hold.expires_at)
    .bind(hold.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Переводит заблокированный hold в expired и освобождает его места.
async fn expire_locked(conn: &mut PgConnection, mut hold: Hold, now: DateTime<Utc>) -> EngineResult<Hold> {
    hold.status = HoldStatus::Expired;
    hold.updated_at = now;
    set_hold_state(&mut *conn, &hold).await?;
    free_seats(conn, &hold, &hold.seat_ids, SeatEventKind::HoldExpired, now).await?;
    Ok(hold)
}

fn unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn publish(&self, event_id: i64, seats: Vec<InventorySeat>) -> EngineResult<usize> {
        let mut tx = self.pool.begin().await?;
        // Сериализуем публикации одного события
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        if event_exists(&mut tx, event_id).await? {
            return Err(EngineError::conflict(format!("event {} is already published", event_id)));
        }

        for (chunk_no, chunk) in seats.chunks(PUBLISH_CHUNK).enumerate() {
            let first = (chunk_no * PUBLISH_CHUNK) as i32;
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO inventory_seats (event_id, seat_id, zone_id, row_label, number, label, x, y, \
                 category_id, price_cents, status, hold_id, held_by, held_until, booking_id, ordinal) ",
            );
            builder.push_values(chunk.iter().enumerate(), |mut b, (i, s)| {
                b.push_bind(event_id)
                    .push_bind(s.seat_id.as_str().to_string())
                    .push_bind(s.zone_id.clone())
                    .push_bind(s.row_label.clone())
                    .push_bind(s.number)
                    .push_bind(s.label.clone())
                    .push_bind(s.x)
                    .push_bind(s.y)
                    .push_bind(s.category_id.clone())
                    .push_bind(s.price_cents)
                    .push_bind(s.status)
                    .push_bind(s.hold_id)
                    .push_bind(s.held_by.clone())
                    .push_bind(s.held_until)
                    .push_bind(s.booking_id)
                    .push_bind(first + i as i32);
            });
            builder.build().execute(&mut *tx).await.map_err(|e| {
                if unique_violation(&e) {
                    EngineError::validation("duplicate seat id in published layout")
                } else {
                    EngineError::from(e)
                }
            })?;
        }

        tx.commit().await?;
        Ok(seats.len())
    }

    async fn list_seats(&self, event_id: i64) -> EngineResult<Vec<InventorySeat>> {
        let seats = sqlx::query_as::<_, InventorySeat>(
            "SELECT * FROM inventory_seats WHERE event_id = $1 ORDER BY ordinal",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        if seats.is_empty() {
            return Err(EngineError::not_found("event", event_id));
        }
        Ok(seats)
    }

    async fn find_seats(&self, event_id: i64, seat_ids: &[SeatId]) -> EngineResult<Vec<InventorySeat>> {
        let mut conn = self.pool.acquire().await?;
        if !event_exists(&mut conn, event_id).await? {
            return Err(EngineError::not_found("event", event_id));
        }
        let found = sqlx::query_as::<_, InventorySeat>(
            "SELECT * FROM inventory_seats WHERE event_id = $1 AND seat_id = ANY($2)",
        )
        .bind(event_id)
        .bind(raw_ids(seat_ids))
        .fetch_all(&mut *conn)
        .await?;

        // Ответ в порядке запроса
        seat_ids
            .iter()
            .map(|id| {
                found
                    .iter()
                    .find(|s| &s.seat_id == id)
                    .cloned()
                    .ok_or_else(|| EngineError::not_found("seat", id))
            })
            .collect()
    }

    async fn find_hold(&self, hold_id: Uuid) -> EngineResult<Option<Hold>> {
        let row: Option<HoldRow> = sqlx::query_as(
            "SELECT id, session_id, event_id, seat_ids, status, created_at, expires_at, updated_at
             FROM seat_holds WHERE id = $1",
        )
        .bind(hold_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Hold::from))
    }

    async fn claim(&self, claim: SeatClaim) -> EngineResult<Hold> {
        let now = claim.now;
        let mut tx = self.pool.begin().await?;

        if !event_exists(&mut tx, claim.event_id).await? {
            return Err(EngineError::not_found("event", claim.event_id));
        }

        let (live, lapsed) = match lock_session_hold(&mut tx, claim.event_id, &claim.session_id).await? {
            Some(hold) if hold.is_live(now) => (Some(hold), None),
            Some(hold) => (None, Some(hold)),
            None => (None, None),
        };
        let live_id = live.as_ref().map(|h| h.id);

        let owned = live.as_ref().map(|h| h.seat_ids.clone()).unwrap_or_default();
        let merged = merge_seat_ids(&owned, &claim.seat_ids);

        // Места просроченного hold и запрошенные блокируются одним запросом,
        // иначе порядок по seat_id нарушается между двумя пачками.
        let seats = match lapsed {
            Some(lapsed) => {
                let all = merge_seat_ids(&lapsed.seat_ids, &merged);
                lock_seats(&mut tx, claim.event_id, &all).await?;
                expire_locked(&mut tx, lapsed, now).await?;
                // строки уже наши, повторное чтение не ждёт
                lock_seats(&mut tx, claim.event_id, &merged).await?
            }
            None => lock_seats(&mut tx, claim.event_id, &merged).await?,
        };

        if let Some(missing) = claim
            .seat_ids
            .iter()
            .find(|id| !seats.iter().any(|s| &s.seat_id == *id))
        {
            return Err(EngineError::not_found("seat", missing));
        }

        let unavailable: Vec<SeatId> = claim
            .seat_ids
            .iter()
            .filter(|id| {
                !seats
                    .iter()
                    .any(|s| &s.seat_id == *id && s.claimable_by(live_id, now))
            })
            .cloned()
            .collect();
        if !unavailable.is_empty() {
            return Err(EngineError::SeatUnavailable { seat_ids: unavailable });
        }

        if merged.len() > claim.max_seats {
            return Err(EngineError::validation(format!(
                "a hold may contain at most {} seats",
                claim.max_seats
            )));
        }

        let hold = match live {
            Some(mut hold) => {
                hold.seat_ids = merged.clone();
                hold.expires_at = claim.expires_at;
                hold.updated_at = now;
                set_hold_state(&mut tx, &hold).await?;
                hold
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
                sqlx::query(
                    "INSERT INTO seat_holds (id, session_id, event_id, seat_ids, status, created_at, expires_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                )
                .bind(hold.id)
                .bind(&hold.session_id)
                .bind(hold.event_id)
                .bind(raw_ids(&hold.seat_ids))
                .bind(hold.status)
                .bind(hold.created_at)
                .bind(hold.expires_at)
                .bind(hold.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if unique_violation(&e) {
                        EngineError::conflict("another hold for this session is being created")
                    } else {
                        EngineError::from(e)
                    }
                })?;
                hold
            }
        };

        sqlx::query(
            "UPDATE inventory_seats
             SET status = 'held', hold_id = $3, held_by = $4, held_until = $5
             WHERE event_id = $1 AND seat_id = ANY($2)",
        )
        .bind(hold.event_id)
        .bind(raw_ids(&hold.seat_ids))
        .bind(hold.id)
        .bind(&hold.session_id)
        .bind(hold.expires_at)
        .execute(&mut *tx)
        .await?;

        let mut events = Vec::with_capacity(seats.len());
        for seat in &seats {
            events.extend(seat.lapsed_hold_event(now));
            let extended = seat.status == SeatStatus::Held && seat.hold_id == Some(hold.id);
            let (kind, from) = if extended {
                (SeatEventKind::HoldExtended, SeatStatus::Held)
            } else {
                (SeatEventKind::HoldCreated, seat.effective_status(now))
            };
            events.push(SeatEvent::new(
                hold.event_id,
                seat.seat_id.clone(),
                kind,
                from,
                hold.id,
                &hold.session_id,
                now,
            ));
        }
        record_events(&mut tx, &events).await?;

        tx.commit().await?;
        Ok(hold)
    }

    async fn release(
        &self,
        hold_id: Uuid,
        seat_ids: Option<&[SeatId]>,
        now: DateTime<Utc>,
    ) -> EngineResult<Hold> {
        let mut tx = self.pool.begin().await?;
        let mut hold = lock_hold(&mut tx, hold_id)
            .await?
            .ok_or_else(|| EngineError::not_found("hold", hold_id))?;

        match hold.status {
            HoldStatus::Committed => {
                return Err(EngineError::conflict(format!("hold {} is already committed", hold_id)))
            }
            HoldStatus::Released | HoldStatus::Expired => return Ok(hold),
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

        set_hold_state(&mut tx, &hold).await?;
        free_seats(&mut tx, &hold, &targets, SeatEventKind::HoldReleased, now).await?;
        tx.commit().await?;
        Ok(hold)
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> EngineResult<Vec<Hold>> {
        let stale: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM seat_holds
             WHERE status = 'active' AND expires_at <= $1
             ORDER BY expires_at
             LIMIT $2",
        )
        .bind(now)
        .bind(EXPIRE_BATCH)
        .fetch_all(&self.pool)
        .await?;

        let mut expired = Vec::with_capacity(stale.len());
        for hold_id in stale {
            let mut tx = self.pool.begin().await?;
            // Между выборкой и блокировкой hold мог быть продлён, продан или отпущен
            let hold = match lock_hold(&mut tx, hold_id).await? {
                Some(hold) if hold.status == HoldStatus::Active && hold.expires_at <= now => hold,
                _ => continue,
            };
            match expire_locked(&mut tx, hold, now).await {
                Ok(hold) => {
                    tx.commit().await?;
                    expired.push(hold);
                }
                Err(e) => warn!("Failed to expire hold {}: {}", hold_id, e),
            }
        }
        Ok(expired)
    }

    async fn commit(&self, draft: BookingDraft) -> EngineResult<Booking> {
        let now = draft.now;
        let mut tx = self.pool.begin().await?;
        let mut hold = lock_hold(&mut tx, draft.hold_id)
            .await?
            .ok_or_else(|| EngineError::not_found("hold", draft.hold_id))?;

        match hold.status {
            HoldStatus::Committed => {
                let row: Option<BookingRow> =
                    sqlx::query_as("SELECT * FROM bookings WHERE hold_id = $1")
                        .bind(hold.id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return row.map(Booking::from).ok_or_else(|| {
                    EngineError::Storage(format!("committed hold {} has no booking", hold.id))
                });
            }
            HoldStatus::Released => {
                return Err(EngineError::conflict(format!("hold {} was released", hold.id)))
            }
            HoldStatus::Expired => return Err(EngineError::HoldExpired { hold_id: hold.id }),
            HoldStatus::Active if !hold.is_live(now) => {
                let hold_id = hold.id;
                expire_locked(&mut tx, hold.clone(), now).await?;
                tx.commit().await?;
                return Err(EngineError::HoldExpired { hold_id });
            }
            HoldStatus::Active => {}
        }

        let seats = lock_seats(&mut tx, hold.event_id, &hold.seat_ids).await?;
        let mut amount_cents = 0i64;
        for id in &hold.seat_ids {
            match seats.iter().find(|s| &s.seat_id == id) {
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

        sqlx::query(
            "INSERT INTO bookings (id, event_id, hold_id, session_id, seat_ids, buyer, amount_cents,
                                   payment_reference, payment_fingerprint, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(booking.id)
        .bind(booking.event_id)
        .bind(booking.hold_id)
        .bind(&booking.session_id)
        .bind(raw_ids(&booking.seat_ids))
        .bind(Json(&booking.buyer))
        .bind(booking.amount_cents)
        .bind(&booking.payment_reference)
        .bind(&booking.payment_fingerprint)
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE inventory_seats
             SET status = 'sold', booking_id = $3, hold_id = NULL, held_by = NULL, held_until = NULL
             WHERE event_id = $1 AND seat_id = ANY($2)",
        )
        .bind(hold.event_id)
        .bind(raw_ids(&hold.seat_ids))
        .bind(booking.id)
        .execute(&mut *tx)
        .await?;

        hold.status = HoldStatus::Committed;
        hold.updated_at = now;
        set_hold_state(&mut tx, &hold).await?;

        let events: Vec<SeatEvent> = hold
            .seat_ids
            .iter()
            .map(|id| {
                SeatEvent::new(
                    hold.event_id,
                    id.clone(),
                    SeatEventKind::Sold,
                    SeatStatus::Held,
                    hold.id,
                    &hold.session_id,
                    now,
                )
            })
            .collect();
        record_events(&mut tx, &events).await?;

        tx.commit().await?;
        Ok(booking)
    }

    async fn find_booking_by_hold(&self, hold_id: Uuid) -> EngineResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as("SELECT * FROM bookings WHERE hold_id = $1")
            .bind(hold_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Booking::from))
    }

    async fn seat_events(&self, event_id: i64, limit: usize) -> EngineResult<Vec<SeatEvent>> {
        let mut events = sqlx::query_as::<_, SeatEvent>(
            "SELECT event_id, seat_id, kind, from_status, to_status, hold_id, session_id, occurred_at
             FROM seat_events
             WHERE event_id = $1
             ORDER BY id DESC
             LIMIT $2",
        )
        .bind(event_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        events.reverse();
        Ok(events)
    }
}
