mod common;

use chrono::Utc;

use common::{rect_zone, venue_only, EVENT_ID};
use venue_seating::error::EngineError;
use venue_seating::models::{SeatCategory, SeatKey, ShapeKind, VenueLayout};
use venue_seating::storage::{LayoutRepository, MemoryLayoutRepository};

fn seat_ids(layout: &VenueLayout) -> Vec<String> {
    layout.seats().map(|(_, s)| s.id.to_string()).collect()
}

#[tokio::test]
async fn price_edits_keep_seat_identity() {
    let h = venue_only().await;
    let before = h.state.layouts.get_venue(h.venue_id).await.unwrap();

    h.state
        .layouts
        .upsert_category(
            h.venue_id,
            SeatCategory { id: "std".into(), name: "Standard".into(), color: "#000".into(), price_cents: 4000 },
        )
        .await
        .unwrap();

    let mut zone = rect_zone("main", 5, 5);
    zone.name = "Renamed".into();
    let (record, report) = h.state.layouts.update_zone(h.venue_id, zone).await.unwrap();
    assert_eq!(report.kept, 25);
    assert_eq!(report.added, 0);
    assert_eq!(report.removed, 0);

    let after = h.state.layouts.get_venue(h.venue_id).await.unwrap();
    assert_eq!(seat_ids(&before), seat_ids(&after));
    let positions_before: Vec<_> = before.seats().map(|(_, s)| s.position).collect();
    let positions_after: Vec<_> = after.seats().map(|(_, s)| s.position).collect();
    assert_eq!(positions_before, positions_after);
    assert!(record.seats.iter().all(|s| s.price_cents == 4000));
    assert!(after.version > before.version);
}

#[tokio::test]
async fn regeneration_keeps_surviving_overrides() {
    let h = venue_only().await;
    let layouts = &h.state.layouts;
    layouts
        .set_seat_override(h.venue_id, "main", SeatKey::new("A", 1), Some(9900))
        .await
        .unwrap();
    layouts
        .set_seat_override(h.venue_id, "main", SeatKey::new("E", 5), Some(100))
        .await
        .unwrap();

    let (record, report) = layouts.update_zone(h.venue_id, rect_zone("main", 3, 3)).await.unwrap();
    assert_eq!(record.seats.len(), 9);
    assert_eq!(report.kept, 9);
    assert_eq!(report.removed, 16);
    assert_eq!(report.overrides_dropped, 1);

    let a1 = record.seats.iter().find(|s| s.label == "A1").unwrap();
    assert_eq!(a1.price_cents, 9900);
    assert_eq!(a1.id.as_str(), "main-A-1");
    assert!(record.seats.iter().filter(|s| s.label != "A1").all(|s| s.price_cents == 2500));

    // Обратно 5x5: E5 вернулся, но его ручная цена уже потеряна
    let (record, report) = layouts.update_zone(h.venue_id, rect_zone("main", 5, 5)).await.unwrap();
    assert_eq!(report.added, 16);
    let e5 = record.seats.iter().find(|s| s.label == "E5").unwrap();
    assert_eq!(e5.price_cents, 2500);
}

#[tokio::test]
async fn override_for_missing_seat_is_not_found() {
    let h = venue_only().await;
    let err = h
        .state
        .layouts
        .set_seat_override(h.venue_id, "main", SeatKey::new("Z", 1), Some(10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { resource: "seat", .. }));
}

#[tokio::test]
async fn publish_is_a_snapshot() {
    let h = venue_only().await;
    h.state.layouts.publish(h.venue_id, EVENT_ID).await.unwrap();

    h.state
        .layouts
        .upsert_category(
            h.venue_id,
            SeatCategory { id: "std".into(), name: "Standard".into(), color: "#000".into(), price_cents: 9999 },
        )
        .await
        .unwrap();
    h.state.layouts.update_zone(h.venue_id, rect_zone("main", 2, 2)).await.unwrap();

    let seats = h.state.inventory.get_all(EVENT_ID).await.unwrap();
    assert_eq!(seats.len(), 25);
    assert!(seats.iter().all(|s| s.price_cents == 2500));

    let err = h.state.layouts.publish(h.venue_id, EVENT_ID).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Новое событие получает текущую схему
    assert_eq!(h.state.layouts.publish(h.venue_id, EVENT_ID + 1).await.unwrap(), 4);
}

#[tokio::test]
async fn seat_map_uses_venue_coordinates() {
    let h = venue_only().await;
    let mut zone = rect_zone("balcony", 1, 2);
    zone.x = 500.0;
    zone.y = 100.0;
    h.state.layouts.add_zone(h.venue_id, zone).await.unwrap();
    h.state.layouts.publish(h.venue_id, EVENT_ID).await.unwrap();

    let map = h.state.inventory.seat_map(EVENT_ID).await.unwrap();
    assert_eq!(map.len(), 27);
    let b1 = map.iter().find(|e| e.seat_id.as_str() == "balcony-A-1").unwrap();
    assert!((b1.x - 510.0).abs() < 1e-9);
    assert!((b1.y - 200.0).abs() < 1e-9);
}

#[tokio::test]
async fn category_in_use_needs_replacement() {
    let h = venue_only().await;
    let layouts = &h.state.layouts;

    let err = layouts.delete_category(h.venue_id, "std", None).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    layouts
        .upsert_category(
            h.venue_id,
            SeatCategory { id: "vip".into(), name: "VIP".into(), color: "#ffcc00".into(), price_cents: 8000 },
        )
        .await
        .unwrap();
    let venue = layouts.delete_category(h.venue_id, "std", Some("vip")).await.unwrap();
    assert!(venue.category("std").is_none());
    assert_eq!(venue.zone("main").unwrap().zone.category_id.as_deref(), Some("vip"));
    assert!(venue.seats().all(|(_, s)| s.price_cents == 8000));
}

#[tokio::test]
async fn zone_validation() {
    let h = venue_only().await;
    let layouts = &h.state.layouts;

    let err = layouts.add_zone(h.venue_id, rect_zone("main", 1, 1)).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let mut flat = rect_zone("flat", 2, 2);
    flat.width = 0.0;
    let err = layouts.add_zone(h.venue_id, flat).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let mut orphan = rect_zone("orphan", 2, 2);
    orphan.category_id = Some("missing".into());
    let err = layouts.add_zone(h.venue_id, orphan).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // Пустая зона допустима и просто не даёт мест
    let record = layouts.add_zone(h.venue_id, rect_zone("empty", 0, 4)).await.unwrap();
    assert!(record.seats.is_empty());
    // Огромная сетка отклоняется до генерации, существующая зона не меняется
    let err = layouts.add_zone(h.venue_id, rect_zone("huge", 200_000, 200_000)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = layouts.update_zone(h.venue_id, rect_zone("main", 200_000, 200_000)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let venue = layouts.get_venue(h.venue_id).await.unwrap();
    assert_eq!(venue.seat_count(), 25);
}

#[tokio::test]
async fn tables_and_curves_publish() {
    let h = venue_only().await;
    let layouts = &h.state.layouts;

    let mut table = rect_zone("t1", 0, 0);
    table.shape = ShapeKind::Circle;
    table.width = 60.0;
    table.height = 60.0;
    table.capacity = 8;
    let record = layouts.add_zone(h.venue_id, table).await.unwrap();
    assert_eq!(record.seats.len(), 8);

    let mut arc = rect_zone("arc", 4, 10);
    arc.shape = ShapeKind::CurvedRows;
    arc.curvature = 40.0;
    let record = layouts.add_zone(h.venue_id, arc).await.unwrap();
    assert_eq!(record.seats.len(), 40);

    assert_eq!(layouts.publish(h.venue_id, EVENT_ID).await.unwrap(), 25 + 8 + 40);
}

#[tokio::test]
async fn stale_layout_version_is_rejected() {
    let repo = MemoryLayoutRepository::new();
    let mut layout = VenueLayout::new("Hall", None, Utc::now());
    repo.insert(&layout).await.unwrap();
    assert!(matches!(repo.insert(&layout).await, Err(EngineError::Conflict(_))));

    layout.touch(Utc::now());
    repo.save(&layout, 0).await.unwrap();

    let mut stale = layout.clone();
    stale.touch(Utc::now());
    // Ожидаем версию 0, а в хранилище уже 1
    assert!(matches!(repo.save(&stale, 0).await, Err(EngineError::Conflict(_))));
    assert_eq!(repo.find(layout.venue_id).await.unwrap().unwrap().version, 1);
}

#[tokio::test]
async fn unknown_venue_is_not_found() {
    let h = venue_only().await;
    let err = h.state.layouts.get_venue(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { resource: "venue", .. }));
}
