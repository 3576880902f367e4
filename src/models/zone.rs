use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{EngineError, EngineResult};

/// Точка в локальных координатах зоны либо в координатах площадки.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rect,
    Circle,
    Polygon,
    CurvedRows,
    RectTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    #[default]
    Alpha,
    Numeric,
}

pub const MAX_CURVATURE: f64 = 100.0;
pub const MAX_ZONE_ROWS: i32 = 500;
pub const MAX_ZONE_COLS: i32 = 500;
/// Потолок rows * cols для одной зоны.
pub const MAX_ZONE_SEATS: i64 = 20_000;
pub const MAX_TABLE_CAPACITY: i32 = 200;
pub const MAX_POLYGON_POINTS: u64 = 256;

/// Зона, нарисованная организатором.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Zone {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub shape: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    #[validate(range(max = MAX_ZONE_ROWS))]
    pub rows: i32,
    #[serde(default)]
    #[validate(range(max = MAX_ZONE_COLS))]
    pub cols: i32,
    /// Кривизна рядов в процентах, 0 - прямые ряды.
    #[serde(default)]
    #[validate(range(min = 0.0, max = MAX_CURVATURE))]
    pub curvature: f64,
    #[serde(default)]
    pub naming: NamingScheme,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Число мест вокруг стола (для circle / rect-table).
    #[serde(default)]
    #[validate(range(max = MAX_TABLE_CAPACITY))]
    pub capacity: i32,
    /// Вершины многоугольника в локальных координатах.
    #[serde(default)]
    #[validate(length(max = MAX_POLYGON_POINTS))]
    pub points: Vec<Point>,
}

impl Zone {
    /// Проверка геометрии до генерации мест. Пустые ряды/колонки ошибкой не считаются,
    /// слишком большие - считаются.
    pub fn check_geometry(&self) -> EngineResult<()> {
        Validate::validate(self)?;
        if self.id.trim().is_empty() {
            return Err(EngineError::validation("zone id must not be empty"));
        }
        let dims = [self.x, self.y, self.width, self.height, self.rotation, self.curvature];
        if dims.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::validation(format!(
                "zone {} has non-finite geometry",
                self.id
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(EngineError::validation(format!(
                "zone {} must have positive width and height",
                self.id
            )));
        }
        if !(0.0..=MAX_CURVATURE).contains(&self.curvature) {
            return Err(EngineError::validation(format!(
                "zone {} curvature must be within 0..={}",
                self.id, MAX_CURVATURE
            )));
        }
        if self.rows > 0 && self.cols > 0 && self.rows as i64 * self.cols as i64 > MAX_ZONE_SEATS {
            return Err(EngineError::validation(format!(
                "zone {} has more than {} seats",
                self.id, MAX_ZONE_SEATS
            )));
        }
        if self.shape == ShapeKind::Polygon {
            if self.points.len() < 3 {
                return Err(EngineError::validation(format!(
                    "polygon zone {} needs at least 3 points",
                    self.id
                )));
            }
            if self.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                return Err(EngineError::validation(format!(
                    "polygon zone {} has non-finite points",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Меняет ли правка набор мест (ряды, колонки, кривизна, вместимость, размеры, форма).
    pub fn seating_changed(&self, other: &Zone) -> bool {
        self.shape != other.shape
            || self.rows != other.rows
            || self.cols != other.cols
            || self.curvature != other.curvature
            || self.capacity != other.capacity
            || self.width != other.width
            || self.height != other.height
            || self.naming != other.naming
            || self.points != other.points
    }

    /// Перевод локальной точки зоны в координаты площадки (поворот вокруг origin зоны, градусы).
    pub fn to_venue(&self, local: Point) -> Point {
        let radians = self.rotation.to_radians();
        let (sin, cos) = radians.sin_cos();
        Point {
            x: self.x + local.x * cos - local.y * sin,
            y: self.y + local.x * sin + local.y * cos,
        }
    }
}

/// Категория мест с базовой ценой (в минимальных единицах валюты).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatCategory {
    pub id: String,
    pub name: String,
    pub color: String,
    pub price_cents: i64,
}
