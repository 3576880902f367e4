#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

use venue_seating::clock::ManualClock;
use venue_seating::config::Config;
use venue_seating::models::{
    BuyerContact, NamingScheme, PaymentProof, SeatCategory, SeatId, ShapeKind, Zone,
};
use venue_seating::AppState;

pub const EVENT_ID: i64 = 1001;

pub struct Harness {
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    pub venue_id: Uuid,
}

pub fn rect_zone(id: &str, rows: i32, cols: i32) -> Zone {
    Zone {
        id: id.to_string(),
        name: format!("Zone {}", id),
        shape: ShapeKind::Rect,
        x: 0.0,
        y: 0.0,
        width: 200.0,
        height: 200.0,
        rotation: 0.0,
        rows,
        cols,
        curvature: 0.0,
        naming: NamingScheme::Alpha,
        category_id: Some("std".to_string()),
        capacity: 0,
        points: vec![],
    }
}

pub fn seat(label: &str) -> SeatId {
    // main-A-1 для "A1"
    let (row, number) = label.split_at(1);
    SeatId::from_raw(format!("main-{}-{}", row, number))
}

pub fn seats(labels: &[&str]) -> Vec<SeatId> {
    labels.iter().map(|l| seat(l)).collect()
}

pub fn payment(reference: &str) -> PaymentProof {
    PaymentProof { provider: "card".to_string(), reference: reference.to_string() }
}

pub fn buyer() -> BuyerContact {
    BuyerContact {
        name: "Ann Buyer".to_string(),
        email: "ann@example.com".to_string(),
        phone: None,
    }
}

pub fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).single().unwrap_or_else(Utc::now)
}

/// Площадка с одной зоной 5x5 ("main", категория std по 2500) без публикации.
pub async fn venue_only() -> Harness {
    let clock = Arc::new(ManualClock::new(start_time()));
    let state = AppState::in_memory(Config::in_memory(), clock.clone());
    let venue = state.layouts.create_venue("Main Hall", None).await.unwrap();
    state
        .layouts
        .upsert_category(
            venue.venue_id,
            SeatCategory {
                id: "std".into(),
                name: "Standard".into(),
                color: "#3366ff".into(),
                price_cents: 2500,
            },
        )
        .await
        .unwrap();
    state.layouts.add_zone(venue.venue_id, rect_zone("main", 5, 5)).await.unwrap();
    Harness { state, clock, venue_id: venue.venue_id }
}

/// То же, опубликованное как событие EVENT_ID.
pub async fn published_5x5() -> Harness {
    let harness = venue_only().await;
    let count = harness.state.layouts.publish(harness.venue_id, EVENT_ID).await.unwrap();
    assert_eq!(count, 25);
    harness
}
