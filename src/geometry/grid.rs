use super::labels::row_label;
use crate::models::{Point, SeatPlacement, Zone};

/// Центры мест вдоль одной оси: равный шаг между отступами, одно место - по центру.
pub(crate) fn axis_positions(count: usize, dimension: f64, padding: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![dimension / 2.0];
    }
    let padding = padding.clamp(0.0, dimension / 2.0);
    let step = (dimension - 2.0 * padding) / (count as f64 - 1.0);
    (0..count).map(|i| padding + step * i as f64).collect()
}

/// Прямоугольная сетка rows x cols.
pub fn grid(zone: &Zone, padding: f64) -> Vec<SeatPlacement> {
    if zone.rows <= 0 || zone.cols <= 0 {
        return Vec::new();
    }
    let xs = axis_positions(zone.cols as usize, zone.width, padding);
    let ys = axis_positions(zone.rows as usize, zone.height, padding);

    let mut seats = Vec::with_capacity(xs.len() * ys.len());
    for (row, y) in ys.iter().enumerate() {
        let label = row_label(row, zone.naming);
        for (col, x) in xs.iter().enumerate() {
            seats.push(SeatPlacement {
                row_label: label.clone(),
                number: col as u32 + 1,
                position: Point::new(*x, *y),
            });
        }
    }
    seats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evenly_spaced_between_paddings() {
        let xs = axis_positions(5, 100.0, 10.0);
        assert_eq!(xs, vec![10.0, 30.0, 50.0, 70.0, 90.0]);
    }

    #[test]
    fn single_seat_is_centered() {
        assert_eq!(axis_positions(1, 80.0, 10.0), vec![40.0]);
    }

    #[test]
    fn oversized_padding_collapses_to_center() {
        let xs = axis_positions(3, 10.0, 20.0);
        assert!(xs.iter().all(|x| (*x - 5.0).abs() < 1e-9));
    }
}
