use std::f64::consts::PI;

use super::labels::row_label;
use crate::error::{EngineError, EngineResult};
use crate::models::{Point, SeatPlacement, Zone};

/// Радиус стула у прямоугольного стола.
pub const RECT_CHAIR_RADIUS: f64 = 6.0;
/// Зазор между стульями и от кромки стола.
pub const CHAIR_GAP: f64 = 5.0;

/// Круглый стол: места с равным угловым шагом на радиусе `r + chair/2`.
pub fn round_table(zone: &Zone) -> Vec<SeatPlacement> {
    if zone.capacity <= 0 {
        return Vec::new();
    }
    let capacity = zone.capacity as usize;
    let radius = zone.width.min(zone.height) / 2.0;
    let chair_radius = radius / 4.0;
    let distance = radius + chair_radius / 2.0;
    let center = Point::new(zone.width / 2.0, zone.height / 2.0);
    let label = row_label(0, zone.naming);

    (0..capacity)
        .map(|i| {
            let angle = i as f64 / capacity as f64 * 2.0 * PI;
            SeatPlacement {
                row_label: label.clone(),
                number: i as u32 + 1,
                position: Point::new(
                    center.x + angle.cos() * distance,
                    center.y + angle.sin() * distance,
                ),
            }
        })
        .collect()
}

/// Сколько стульев помещается на кромке длиной `length` без углов при шаге не меньше `spacing`.
fn edge_limit(length: f64, spacing: f64) -> usize {
    let slots = (length / spacing).floor() as i64 - 1;
    slots.max(0) as usize
}

/// Делит `capacity` между кромками пропорционально длине (метод наибольшего остатка),
/// не превышая лимит каждой кромки.
fn allocate(capacity: usize, lengths: &[f64; 4], limits: &[usize; 4]) -> [usize; 4] {
    let perimeter: f64 = lengths.iter().sum();
    let ideal: Vec<f64> = lengths
        .iter()
        .map(|l| capacity as f64 * l / perimeter)
        .collect();

    let mut counts = [0usize; 4];
    for i in 0..4 {
        counts[i] = (ideal[i].floor() as usize).min(limits[i]);
    }

    let mut order: Vec<usize> = (0..4).collect();
    order.sort_by(|&a, &b| {
        let fa = ideal[a] - ideal[a].floor();
        let fb = ideal[b] - ideal[b].floor();
        fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
    });

    let mut remaining = capacity - counts.iter().sum::<usize>();
    while remaining > 0 {
        let mut progressed = false;
        for &i in &order {
            if remaining == 0 {
                break;
            }
            if counts[i] < limits[i] {
                counts[i] += 1;
                remaining -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    counts
}

/// Прямоугольный стол: места по четырём сторонам по часовой стрелке, углы пропускаются.
pub fn rect_table(zone: &Zone) -> EngineResult<Vec<SeatPlacement>> {
    if zone.capacity <= 0 {
        return Ok(Vec::new());
    }
    let capacity = zone.capacity as usize;
    let (w, h) = (zone.width, zone.height);
    let spacing = 2.0 * RECT_CHAIR_RADIUS + CHAIR_GAP;
    let offset = RECT_CHAIR_RADIUS + CHAIR_GAP;

    let lengths = [w, h, w, h];
    let limits = [
        edge_limit(w, spacing),
        edge_limit(h, spacing),
        edge_limit(w, spacing),
        edge_limit(h, spacing),
    ];
    let max_seats: usize = limits.iter().sum();
    if capacity > max_seats {
        return Err(EngineError::validation(format!(
            "table zone {} fits at most {} seats, capacity is {}",
            zone.id, max_seats, capacity
        )));
    }

    let counts = allocate(capacity, &lengths, &limits);
    let label = row_label(0, zone.naming);
    let mut seats = Vec::with_capacity(capacity);

    for (edge, &count) in counts.iter().enumerate() {
        let length = lengths[edge];
        for k in 0..count {
            let t = length * (k as f64 + 1.0) / (count as f64 + 1.0);
            let position = match edge {
                0 => Point::new(t, -offset),
                1 => Point::new(w + offset, t),
                2 => Point::new(w - t, h + offset),
                _ => Point::new(-offset, h - t),
            };
            seats.push(SeatPlacement {
                row_label: label.clone(),
                number: seats.len() as u32 + 1,
                position,
            });
        }
    }
    Ok(seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NamingScheme, ShapeKind};

    fn table(shape: ShapeKind, width: f64, height: f64, capacity: i32) -> Zone {
        Zone {
            id: "t1".into(),
            name: String::new(),
            shape,
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            rows: 0,
            cols: 0,
            curvature: 0.0,
            naming: NamingScheme::Alpha,
            category_id: None,
            capacity,
            points: vec![],
        }
    }

    #[test]
    fn round_table_places_chairs_on_one_circle() {
        let z = table(ShapeKind::Circle, 80.0, 80.0, 6);
        let seats = round_table(&z);
        assert_eq!(seats.len(), 6);
        let center = Point::new(40.0, 40.0);
        for s in &seats {
            assert!((s.position.distance(&center) - 45.0).abs() < 1e-9);
        }
        assert_eq!(seats[0].position, Point::new(85.0, 40.0));
        assert_eq!(seats[5].row_label, "A");
        assert_eq!(seats[5].number, 6);
    }

    #[test]
    fn rect_table_splits_by_edge_length() {
        let z = table(ShapeKind::RectTable, 120.0, 60.0, 6);
        let seats = rect_table(&z).unwrap();
        assert_eq!(seats.len(), 6);
        let top = seats.iter().filter(|s| s.position.y < 0.0).count();
        let bottom = seats.iter().filter(|s| s.position.y > 60.0).count();
        let left = seats.iter().filter(|s| s.position.x < 0.0).count();
        let right = seats.iter().filter(|s| s.position.x > 120.0).count();
        assert_eq!((top, right, bottom, left), (2, 1, 2, 1));
    }

    #[test]
    fn rect_table_skips_corners_and_keeps_spacing() {
        let z = table(ShapeKind::RectTable, 100.0, 100.0, 16);
        let seats = rect_table(&z).unwrap();
        assert_eq!(seats.len(), 16);
        for (i, a) in seats.iter().enumerate() {
            for b in seats.iter().skip(i + 1) {
                assert!(a.position.distance(&b.position) >= 2.0 * RECT_CHAIR_RADIUS + CHAIR_GAP - 1e-9);
            }
        }
        let top: Vec<f64> = seats.iter().filter(|s| s.position.y < 0.0).map(|s| s.position.x).collect();
        assert!(top.iter().all(|x| *x > 0.0 && *x < 100.0));
    }

    #[test]
    fn overfull_table_is_rejected() {
        let z = table(ShapeKind::RectTable, 40.0, 40.0, 12);
        assert!(matches!(rect_table(&z), Err(EngineError::Validation(_))));
    }

    #[test]
    fn zero_capacity_is_empty() {
        assert!(round_table(&table(ShapeKind::Circle, 50.0, 50.0, 0)).is_empty());
        assert!(rect_table(&table(ShapeKind::RectTable, 50.0, 50.0, -2)).unwrap().is_empty());
    }
}
