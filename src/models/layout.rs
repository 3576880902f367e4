use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::{
    seat::{Seat, SeatKey, SeatPlacement},
    zone::{SeatCategory, Zone},
};
use crate::error::{EngineError, EngineResult};

/// Ручная цена отдельного места, привязана к (ряд, номер).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatOverride {
    pub row_label: String,
    pub number: u32,
    pub price_cents: i64,
}

impl SeatOverride {
    pub fn key(&self) -> SeatKey {
        SeatKey::new(self.row_label.clone(), self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub zone: Zone,
    pub seats: Vec<Seat>,
    #[serde(default)]
    pub overrides: Vec<SeatOverride>,
}

/// Итог перегенерации мест зоны.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerationReport {
    pub kept: usize,
    pub added: usize,
    pub removed: usize,
    pub overrides_dropped: usize,
}

impl ZoneRecord {
    pub fn new(zone: Zone, placements: Vec<SeatPlacement>) -> Self {
        let mut record = ZoneRecord { zone, seats: Vec::new(), overrides: Vec::new() };
        record.regenerate(placements);
        record
    }

    /// Заменяет набор мест. Идентичность места выводится из (ряд, номер),
    /// поэтому уцелевшие ключи сохраняют id, а метаданные пропавших мест выкидываются.
    pub fn regenerate(&mut self, placements: Vec<SeatPlacement>) -> RegenerationReport {
        let previous: HashSet<SeatKey> = self.seats.iter().map(Seat::key).collect();
        let seats: Vec<Seat> = placements
            .into_iter()
            .map(|p| Seat::from_placement(&self.zone.id, p))
            .collect();
        let current: HashSet<SeatKey> = seats.iter().map(Seat::key).collect();

        let before = self.overrides.len();
        self.overrides.retain(|o| current.contains(&o.key()));

        let report = RegenerationReport {
            kept: current.intersection(&previous).count(),
            added: current.difference(&previous).count(),
            removed: previous.difference(&current).count(),
            overrides_dropped: before - self.overrides.len(),
        };
        self.seats = seats;
        report
    }

    pub fn set_override(&mut self, key: SeatKey, price_cents: Option<i64>) -> EngineResult<()> {
        if !self.seats.iter().any(|s| s.key() == key) {
            return Err(EngineError::not_found(
                "seat",
                format!("{}/{}{}", self.zone.id, key.row_label, key.number),
            ));
        }
        self.overrides.retain(|o| o.key() != key);
        if let Some(price_cents) = price_cents {
            self.overrides.push(SeatOverride {
                row_label: key.row_label,
                number: key.number,
                price_cents,
            });
        }
        Ok(())
    }
}

/// Версионируемое описание площадки.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueLayout {
    pub venue_id: Uuid,
    pub name: String,
    pub version: i64,
    pub background_url: Option<String>,
    pub categories: Vec<SeatCategory>,
    pub zones: Vec<ZoneRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VenueLayout {
    pub fn new(name: impl Into<String>, background_url: Option<String>, now: DateTime<Utc>) -> Self {
        VenueLayout {
            venue_id: Uuid::new_v4(),
            name: name.into(),
            version: 0,
            background_url,
            categories: Vec::new(),
            zones: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn zone(&self, zone_id: &str) -> Option<&ZoneRecord> {
        self.zones.iter().find(|r| r.zone.id == zone_id)
    }

    pub fn zone_mut(&mut self, zone_id: &str) -> Option<&mut ZoneRecord> {
        self.zones.iter_mut().find(|r| r.zone.id == zone_id)
    }

    pub fn category(&self, category_id: &str) -> Option<&SeatCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn zones_using_category(&self, category_id: &str) -> Vec<String> {
        self.zones
            .iter()
            .filter(|r| r.zone.category_id.as_deref() == Some(category_id))
            .map(|r| r.zone.id.clone())
            .collect()
    }

    pub fn seats(&self) -> impl Iterator<Item = (&Zone, &Seat)> {
        self.zones
            .iter()
            .flat_map(|r| r.seats.iter().map(move |s| (&r.zone, s)))
    }

    pub fn seat_count(&self) -> usize {
        self.zones.iter().map(|r| r.seats.len()).sum()
    }

    /// Пересчёт категорий и цен мест: ручная цена, иначе цена категории, иначе 0.
    pub fn reprice(&mut self) {
        let prices: HashMap<String, i64> = self
            .categories
            .iter()
            .map(|c| (c.id.clone(), c.price_cents))
            .collect();

        for record in &mut self.zones {
            let base = record
                .zone
                .category_id
                .as_ref()
                .and_then(|id| prices.get(id).copied())
                .unwrap_or(0);
            let overrides: HashMap<SeatKey, i64> = record
                .overrides
                .iter()
                .map(|o| (o.key(), o.price_cents))
                .collect();

            for seat in &mut record.seats {
                seat.category_id = record.zone.category_id.clone();
                seat.price_cents = overrides.get(&seat.key()).copied().unwrap_or(base);
            }
        }
    }

    /// Инвариант: id мест уникальны в пределах площадки.
    pub fn ensure_unique_seat_ids(&self) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for (_, seat) in self.seats() {
            if !seen.insert(seat.id.clone()) {
                return Err(EngineError::validation(format!(
                    "duplicate seat id {} in venue {}",
                    seat.id, self.venue_id
                )));
            }
        }
        Ok(())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}
