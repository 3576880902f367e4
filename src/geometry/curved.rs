use super::{grid, labels::row_label};
use crate::models::{Point, SeatPlacement, Zone};

/// Ряды-дуги вокруг общего центра над зоной.
///
/// Базовый радиус `(ширина дуги * 100) / кривизна`, каждый следующий ряд дальше
/// на `height / rows`. Места ряда стоят с равным угловым шагом на дуге длиной
/// в доступную ширину. Первый ряд касается верхнего ряда сетки. Кривизна 0 - ровно `grid`.
pub fn curved_rows(zone: &Zone, padding: f64) -> Vec<SeatPlacement> {
    if zone.curvature == 0.0 {
        return grid::grid(zone, padding);
    }
    if zone.rows <= 0 || zone.cols <= 0 {
        return Vec::new();
    }

    let cols = zone.cols as usize;
    let xs = grid::axis_positions(cols, zone.width, padding);
    let rows = zone.rows as usize;
    let ys = grid::axis_positions(rows, zone.height, padding);

    let arc_width = xs[xs.len() - 1] - xs[0];
    let center_x = zone.width / 2.0;

    // Дуге нулевой ширины (одна колонка) радиус не нужен: все места на оси.
    if arc_width <= f64::EPSILON {
        return ys
            .iter()
            .enumerate()
            .flat_map(|(row, y)| {
                let label = row_label(row, zone.naming);
                (0..cols).map(move |col| SeatPlacement {
                    row_label: label.clone(),
                    number: col as u32 + 1,
                    position: Point::new(center_x, *y),
                })
            })
            .collect();
    }

    let base_radius = arc_width * 100.0 / zone.curvature;
    let center_y = ys[0] - base_radius;
    let total_angle = arc_width / base_radius;
    let start_angle = -total_angle / 2.0;
    let angle_step = if cols > 1 { total_angle / (cols as f64 - 1.0) } else { 0.0 };
    let row_step = zone.height / rows as f64;

    let mut seats = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        let label = row_label(row, zone.naming);
        let radius = base_radius + row as f64 * row_step;
        for col in 0..cols {
            let angle = start_angle + angle_step * col as f64;
            seats.push(SeatPlacement {
                row_label: label.clone(),
                number: col as u32 + 1,
                position: Point::new(
                    center_x + radius * angle.sin(),
                    center_y + radius * angle.cos(),
                ),
            });
        }
    }
    seats
}
