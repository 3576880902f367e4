use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::inventory::{InventorySeat, SeatStatus};
use super::seat::SeatId;

pub const MAX_RECOMMEND_QUANTITY: u32 = 50;
/// Сколько вариантов отдаём клиенту.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Пожелания покупателя к подбору мест.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SeatPreferences {
    #[validate(range(min = 1, max = MAX_RECOMMEND_QUANTITY))]
    pub quantity: u32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub min_price_cents: Option<i64>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub max_price_cents: Option<i64>,
    /// Места рядом в одном ряду. По умолчанию да, если мест больше одного.
    #[serde(default)]
    pub keep_together: Option<bool>,
    /// Только эти зоны; пусто - любые.
    #[serde(default)]
    pub zones: Vec<String>,
}

impl SeatPreferences {
    pub fn keeps_together(&self) -> bool {
        self.keep_together.unwrap_or(self.quantity > 1) && self.quantity > 1
    }

    fn accepts(&self, seat: &InventorySeat) -> bool {
        self.min_price_cents.map_or(true, |min| seat.price_cents >= min)
            && self.max_price_cents.map_or(true, |max| seat.price_cents <= max)
            && (self.zones.is_empty() || self.zones.contains(&seat.zone_id))
    }

    /// 0..100: чем дешевле относительно потолка цены, тем выше. Без потолка 50.
    fn price_value(&self, price_cents: i64) -> f64 {
        match self.max_price_cents {
            Some(max) if max > 0 => (max - price_cents) as f64 / max as f64 * 100.0,
            _ => 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub seat_ids: Vec<SeatId>,
    pub labels: Vec<String>,
    /// Зона и ряд, если места рядом; `None` для подборки по одному.
    pub zone_id: Option<String>,
    pub row_label: Option<String>,
    pub total_price_cents: i64,
    pub score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
    pub total_options_found: usize,
}

/// Подбор лучших свободных мест. `seats` - инвентарь в порядке публикации,
/// при равной оценке выигрывает более ранний (ближний к сцене) вариант.
pub fn best_available(
    seats: &[InventorySeat],
    prefs: &SeatPreferences,
    now: DateTime<Utc>,
) -> RecommendationSet {
    let quantity = prefs.quantity as usize;
    if quantity == 0 {
        return RecommendationSet::default();
    }
    let free: Vec<&InventorySeat> = seats
        .iter()
        .filter(|s| s.effective_status(now) == SeatStatus::Available && prefs.accepts(s))
        .collect();

    let mut options = if prefs.keeps_together() {
        consecutive_runs(&free, quantity)
            .into_iter()
            .map(|run| recommendation(&run, prefs, true))
            .collect()
    } else {
        let mut ranked = free;
        ranked.sort_by(|a, b| {
            prefs
                .price_value(b.price_cents)
                .total_cmp(&prefs.price_value(a.price_cents))
        });
        if ranked.len() < quantity {
            Vec::new()
        } else {
            vec![recommendation(&ranked[..quantity], prefs, false)]
        }
    };

    options.sort_by(|a, b| b.score.cmp(&a.score));
    let total_options_found = options.len();
    options.truncate(MAX_RECOMMENDATIONS);
    RecommendationSet { recommendations: options, total_options_found }
}

/// Окна из `quantity` мест одного ряда с номерами подряд.
fn consecutive_runs<'a>(free: &[&'a InventorySeat], quantity: usize) -> Vec<Vec<&'a InventorySeat>> {
    // ряды в порядке первого появления
    let mut rows: Vec<((&str, &str), Vec<&'a InventorySeat>)> = Vec::new();
    for &seat in free {
        let key = (seat.zone_id.as_str(), seat.row_label.as_str());
        match rows.iter_mut().find(|(k, _)| *k == key) {
            Some((_, row)) => row.push(seat),
            None => rows.push((key, vec![seat])),
        }
    }

    let mut runs = Vec::new();
    for (_, mut row) in rows {
        row.sort_by_key(|s| s.number);
        for window in row.windows(quantity) {
            if window.windows(2).all(|pair| pair[1].number == pair[0].number + 1) {
                runs.push(window.to_vec());
            }
        }
    }
    runs
}

fn recommendation(seats: &[&InventorySeat], prefs: &SeatPreferences, together: bool) -> Recommendation {
    let total_price_cents = seats.iter().map(|s| s.price_cents).sum();
    let value = seats.iter().map(|s| prefs.price_value(s.price_cents)).sum::<f64>() / seats.len() as f64;
    let first = seats.first();
    Recommendation {
        seat_ids: seats.iter().map(|s| s.seat_id.clone()).collect(),
        labels: seats.iter().map(|s| s.label.clone()).collect(),
        zone_id: first.filter(|_| together).map(|s| s.zone_id.clone()),
        row_label: first.filter(|_| together).map(|s| s.row_label.clone()),
        total_price_cents,
        score: value.round().clamp(0.0, 100.0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn seat(zone: &str, row: &str, number: i32, price_cents: i64) -> InventorySeat {
        InventorySeat {
            event_id: 1,
            seat_id: SeatId::from_raw(format!("{}-{}-{}", zone, row, number)),
            zone_id: zone.into(),
            row_label: row.into(),
            number,
            label: format!("{}{}", row, number),
            x: 0.0,
            y: 0.0,
            category_id: None,
            price_cents,
            status: SeatStatus::Available,
            hold_id: None,
            held_by: None,
            held_until: None,
            booking_id: None,
        }
    }

    fn prefs(quantity: u32) -> SeatPreferences {
        SeatPreferences { quantity, ..Default::default() }
    }

    #[test]
    fn runs_skip_gaps() {
        let now = Utc::now();
        let mut seats: Vec<InventorySeat> = (1..=5).map(|n| seat("m", "A", n, 1000)).collect();
        seats[2].status = SeatStatus::Sold;

        let set = best_available(&seats, &prefs(2), now);
        let labels: Vec<Vec<String>> = set.recommendations.iter().map(|r| r.labels.clone()).collect();
        assert_eq!(labels, vec![vec!["A1", "A2"], vec!["A4", "A5"]]);
        assert_eq!(set.recommendations[0].row_label.as_deref(), Some("A"));
    }

    #[test]
    fn lapsed_hold_counts_as_free() {
        let now = Utc::now();
        let mut seats: Vec<InventorySeat> = (1..=2).map(|n| seat("m", "A", n, 1000)).collect();
        seats[1].status = SeatStatus::Held;
        seats[1].hold_id = Some(Uuid::new_v4());
        seats[1].held_until = Some(now - Duration::seconds(1));

        let set = best_available(&seats, &prefs(2), now);
        assert_eq!(set.total_options_found, 1);

        seats[1].held_until = Some(now + Duration::minutes(5));
        assert!(best_available(&seats, &prefs(2), now).recommendations.is_empty());
    }

    #[test]
    fn cheaper_runs_rank_first_under_price_cap() {
        let now = Utc::now();
        let seats = vec![
            seat("vip", "A", 1, 9000),
            seat("vip", "A", 2, 9000),
            seat("std", "K", 1, 3000),
            seat("std", "K", 2, 3000),
            seat("std", "K", 3, 12000),
        ];
        let mut p = prefs(2);
        p.max_price_cents = Some(10_000);

        let set = best_available(&seats, &p, now);
        assert_eq!(set.total_options_found, 2);
        assert_eq!(set.recommendations[0].zone_id.as_deref(), Some("std"));
        assert_eq!(set.recommendations[0].total_price_cents, 6000);
        assert_eq!(set.recommendations[0].score, 70);
        assert_eq!(set.recommendations[1].score, 10);
    }

    #[test]
    fn scattered_seats_when_not_together() {
        let now = Utc::now();
        let seats = vec![seat("m", "A", 1, 2000), seat("m", "B", 5, 1000), seat("m", "C", 9, 1500)];
        let mut p = prefs(2);
        p.keep_together = Some(false);
        p.max_price_cents = Some(2000);

        let set = best_available(&seats, &p, now);
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(set.recommendations[0].labels, vec!["B5", "C9"]);
        assert_eq!(set.recommendations[0].zone_id, None);

        p.quantity = 4;
        assert!(best_available(&seats, &p, now).recommendations.is_empty());
    }

    #[test]
    fn zone_filter_and_limit() {
        let now = Utc::now();
        let mut seats: Vec<InventorySeat> = (1..=10).map(|n| seat("m", "A", n, 1000)).collect();
        seats.push(seat("side", "A", 1, 1000));
        let mut p = prefs(1);
        p.zones = vec!["side".into()];
        let set = best_available(&seats, &p, now);
        assert_eq!(set.recommendations[0].labels, vec!["A1"]);
        assert_eq!(set.recommendations[0].seat_ids[0].as_str(), "side-A-1");

        let set = best_available(&seats, &prefs(2), now);
        assert_eq!(set.total_options_found, 9);
        assert_eq!(set.recommendations.len(), MAX_RECOMMENDATIONS);
    }
}
