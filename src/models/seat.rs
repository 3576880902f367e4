use serde::{Deserialize, Serialize};
use std::fmt;

use super::zone::Point;

/// Идентификатор места. Непрозрачный ключ: внутренности кодировки никто не разбирает.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SeatId(String);

impl SeatId {
    pub fn for_position(zone_id: &str, row_label: &str, number: u32) -> Self {
        SeatId(format!("{}-{}-{}", zone_id, row_label, number))
    }

    /// Обёртка над идентификатором, пришедшим от клиента.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        SeatId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ключ места внутри зоны: (ряд, номер). По нему переносятся метаданные при перегенерации.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatKey {
    pub row_label: String,
    pub number: u32,
}

impl SeatKey {
    pub fn new(row_label: impl Into<String>, number: u32) -> Self {
        Self { row_label: row_label.into(), number }
    }
}

/// Результат генератора геометрии: место без привязки к цене.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatPlacement {
    pub row_label: String,
    pub number: u32,
    pub position: Point,
}

impl SeatPlacement {
    pub fn key(&self) -> SeatKey {
        SeatKey::new(self.row_label.clone(), self.number)
    }
}

/// Место в схеме зала.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub zone_id: String,
    pub row_label: String,
    pub number: u32,
    pub label: String,
    /// Координаты относительно зоны.
    pub position: Point,
    pub category_id: Option<String>,
    pub price_cents: i64,
}

impl Seat {
    pub fn from_placement(zone_id: &str, placement: SeatPlacement) -> Self {
        Seat {
            id: SeatId::for_position(zone_id, &placement.row_label, placement.number),
            zone_id: zone_id.to_string(),
            label: format!("{}{}", placement.row_label, placement.number),
            row_label: placement.row_label,
            number: placement.number,
            position: placement.position,
            category_id: None,
            price_cents: 0,
        }
    }

    pub fn key(&self) -> SeatKey {
        SeatKey::new(self.row_label.clone(), self.number)
    }
}
