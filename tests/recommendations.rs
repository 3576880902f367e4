mod common;

use chrono::Duration;

use common::{published_5x5, seats, EVENT_ID};
use venue_seating::error::EngineError;
use venue_seating::models::SeatPreferences;

fn together(quantity: u32) -> SeatPreferences {
    SeatPreferences { quantity, ..Default::default() }
}

fn first_labels(set: &venue_seating::models::RecommendationSet) -> Vec<String> {
    set.recommendations[0].labels.clone()
}

#[tokio::test]
async fn held_seats_break_runs_until_they_lapse() {
    let h = published_5x5().await;
    h.state
        .holds
        .create_or_extend_hold(EVENT_ID, "session-x", &seats(&["A2"]))
        .await
        .unwrap();

    let set = h.state.inventory.recommend(EVENT_ID, &together(3)).await.unwrap();
    assert_eq!(first_labels(&set), vec!["A3", "A4", "A5"]);
    // A: 3-4-5; B..E: по три окна
    assert_eq!(set.total_options_found, 13);
    assert_eq!(set.recommendations.len(), 5);
    assert_eq!(set.recommendations[0].total_price_cents, 7500);

    // Истёкший hold не мешает подбору ещё до прохода sweeper
    h.clock.advance(Duration::minutes(10));
    let set = h.state.inventory.recommend(EVENT_ID, &together(3)).await.unwrap();
    assert_eq!(first_labels(&set), vec!["A1", "A2", "A3"]);
    assert_eq!(set.total_options_found, 15);
}

#[tokio::test]
async fn sold_seats_are_never_recommended() {
    let h = published_5x5().await;
    let grant = h
        .state
        .holds
        .create_or_extend_hold(EVENT_ID, "session-x", &seats(&["A1", "A2", "A3", "A4", "A5"]))
        .await
        .unwrap();
    h.state
        .bookings
        .commit(grant.hold_id, common::payment("pay-r1"), common::buyer())
        .await
        .unwrap();

    let set = h.state.inventory.recommend(EVENT_ID, &together(5)).await.unwrap();
    assert_eq!(first_labels(&set), vec!["B1", "B2", "B3", "B4", "B5"]);
    assert!(set
        .recommendations
        .iter()
        .all(|r| r.row_label.as_deref() != Some("A")));
}

#[tokio::test]
async fn price_cap_and_bad_requests() {
    let h = published_5x5().await;
    let inventory = &h.state.inventory;

    let mut cheap = together(2);
    cheap.max_price_cents = Some(2000);
    let set = inventory.recommend(EVENT_ID, &cheap).await.unwrap();
    assert!(set.recommendations.is_empty());
    assert_eq!(set.total_options_found, 0);

    let mut inverted = together(2);
    inverted.min_price_cents = Some(5000);
    inverted.max_price_cents = Some(1000);
    let err = inventory.recommend(EVENT_ID, &inverted).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = inventory.recommend(EVENT_ID, &together(0)).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = inventory.recommend(999, &together(2)).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}
