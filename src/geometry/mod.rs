//! Генератор геометрии зон.
//!
//! Чистые функции: параметры зоны -> список мест с координатами относительно зоны.
//! Один и тот же вход всегда даёт один и тот же выход, на этом держится сверка
//! мест при перегенерации.

pub mod curved;
pub mod grid;
pub mod labels;
pub mod polygon;
pub mod table;

use crate::error::EngineResult;
use crate::models::{SeatPlacement, ShapeKind, Zone};

/// Отступ от края зоны до центров крайних мест.
pub const DEFAULT_PADDING: f64 = 10.0;

/// Разворачивает зону в места. Вырожденные размеры - ошибка валидации,
/// нулевые ряды/колонки/вместимость - пустой список.
pub fn generate(zone: &Zone, padding: f64) -> EngineResult<Vec<SeatPlacement>> {
    zone.check_geometry()?;
    let seats = match zone.shape {
        ShapeKind::Rect | ShapeKind::CurvedRows => curved::curved_rows(zone, padding),
        ShapeKind::Polygon => polygon::polygon_grid(zone, padding),
        ShapeKind::Circle => table::round_table(zone),
        ShapeKind::RectTable => table::rect_table(zone)?,
    };
    Ok(seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{NamingScheme, Seat};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn zone(rows: i32, cols: i32, curvature: f64) -> Zone {
        Zone {
            id: "main".into(),
            name: "Main floor".into(),
            shape: ShapeKind::Rect,
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 200.0,
            rotation: 0.0,
            rows,
            cols,
            curvature,
            naming: NamingScheme::Alpha,
            category_id: None,
            capacity: 0,
            points: vec![],
        }
    }

    #[test]
    fn five_by_five_labels() {
        let seats = generate(&zone(5, 5, 0.0), DEFAULT_PADDING).unwrap();
        let labels: Vec<String> = seats
            .into_iter()
            .map(|p| Seat::from_placement("main", p).label)
            .collect();
        let expected: Vec<String> = ["A", "B", "C", "D", "E"]
            .iter()
            .flat_map(|r| (1..=5).map(move |n| format!("{}{}", r, n)))
            .collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn empty_counts_yield_no_seats() {
        assert!(generate(&zone(0, 5, 0.0), DEFAULT_PADDING).unwrap().is_empty());
        assert!(generate(&zone(3, -1, 20.0), DEFAULT_PADDING).unwrap().is_empty());
    }

    #[test]
    fn degenerate_zone_is_rejected() {
        let mut z = zone(3, 3, 0.0);
        z.height = 0.0;
        assert!(matches!(generate(&z, DEFAULT_PADDING), Err(EngineError::Validation(_))));
    }

    #[test]
    fn oversized_zone_is_rejected_before_generation() {
        let z = zone(200_000, 200_000, 0.0);
        assert!(matches!(generate(&z, DEFAULT_PADDING), Err(EngineError::Validation(_))));
    }

    #[test]
    fn deterministic_output() {
        let z = zone(7, 11, 35.0);
        assert_eq!(generate(&z, DEFAULT_PADDING).unwrap(), generate(&z, DEFAULT_PADDING).unwrap());
    }

    proptest! {
        #[test]
        fn grid_count_and_unique_ids(rows in 1i32..40, cols in 1i32..40, curvature in 0.0f64..100.0) {
            let seats = generate(&zone(rows, cols, curvature), DEFAULT_PADDING).unwrap();
            prop_assert_eq!(seats.len(), (rows * cols) as usize);
            let ids: HashSet<_> = seats
                .into_iter()
                .map(|p| Seat::from_placement("main", p).id)
                .collect();
            prop_assert_eq!(ids.len(), (rows * cols) as usize);
        }

        #[test]
        fn zero_curvature_matches_grid(rows in 0i32..30, cols in 0i32..30) {
            let mut curved = zone(rows, cols, 0.0);
            curved.shape = ShapeKind::CurvedRows;
            let flat = generate(&zone(rows, cols, 0.0), DEFAULT_PADDING).unwrap();
            prop_assert_eq!(generate(&curved, DEFAULT_PADDING).unwrap(), flat);
        }
    }
}
