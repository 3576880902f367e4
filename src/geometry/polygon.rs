use super::grid;
use crate::models::{Point, SeatPlacement, Zone};

/// Сетка по габаритам зоны, оставляем только центры внутри многоугольника.
/// Номер места берётся из колонки сетки, чтобы ключ (ряд, номер) не плыл при правке контура.
pub fn polygon_grid(zone: &Zone, padding: f64) -> Vec<SeatPlacement> {
    grid::grid(zone, padding)
        .into_iter()
        .filter(|seat| contains(&zone.points, seat.position))
        .collect()
}

/// Ray casting: нечётное число пересечений луча вправо - точка внутри.
pub fn contains(polygon: &[Point], point: Point) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
