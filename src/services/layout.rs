use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::CacheService;
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::geometry;
use crate::models::{
    InventorySeat, RegenerationReport, SeatCategory, SeatKey, SeatStatus, VenueLayout, Zone,
    ZoneRecord,
};
use crate::storage::{InventoryStore, LayoutRepository};

/// Редактор схемы площадки и публикация событий.
///
/// Каждое изменение: загрузить схему, применить правку, пересчитать цены,
/// проверить уникальность id мест и сохранить с проверкой версии.
pub struct LayoutService {
    repo: Arc<dyn LayoutRepository>,
    inventory: Arc<dyn InventoryStore>,
    cache: CacheService,
    clock: Arc<dyn Clock>,
    padding: f64,
}

impl LayoutService {
    pub fn new(
        repo: Arc<dyn LayoutRepository>,
        inventory: Arc<dyn InventoryStore>,
        cache: CacheService,
        clock: Arc<dyn Clock>,
        padding: f64,
    ) -> Self {
        Self { repo, inventory, cache, clock, padding }
    }

    pub async fn create_venue(
        &self,
        name: &str,
        background_url: Option<String>,
    ) -> EngineResult<VenueLayout> {
        if name.trim().is_empty() {
            return Err(EngineError::validation("venue name must not be empty"));
        }
        let layout = VenueLayout::new(name.trim(), background_url, self.clock.now());
        self.repo.insert(&layout).await?;
        info!("Venue {} '{}' created", layout.venue_id, layout.name);
        Ok(layout)
    }

    pub async fn get_venue(&self, venue_id: Uuid) -> EngineResult<VenueLayout> {
        self.repo
            .find(venue_id)
            .await?
            .ok_or_else(|| EngineError::not_found("venue", venue_id))
    }

    pub async fn set_background(
        &self,
        venue_id: Uuid,
        background_url: Option<String>,
    ) -> EngineResult<VenueLayout> {
        self.edit(venue_id, |layout| {
            layout.background_url = background_url;
            Ok(())
        })
        .await
        .map(|(layout, _)| layout)
    }

    /// Создаёт категорию или меняет существующую с тем же id.
    pub async fn upsert_category(
        &self,
        venue_id: Uuid,
        category: SeatCategory,
    ) -> EngineResult<VenueLayout> {
        if category.id.trim().is_empty() {
            return Err(EngineError::validation("category id must not be empty"));
        }
        if category.price_cents < 0 {
            return Err(EngineError::validation("category price must not be negative"));
        }
        self.edit(venue_id, |layout| {
            match layout.categories.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => *existing = category,
                None => layout.categories.push(category),
            }
            Ok(())
        })
        .await
        .map(|(layout, _)| layout)
    }

    /// Категорию, на которую ссылаются зоны, можно удалить только с переносом зон на замену.
    pub async fn delete_category(
        &self,
        venue_id: Uuid,
        category_id: &str,
        replacement: Option<&str>,
    ) -> EngineResult<VenueLayout> {
        self.edit(venue_id, |layout| {
            if layout.category(category_id).is_none() {
                return Err(EngineError::not_found("category", category_id));
            }
            let users = layout.zones_using_category(category_id);
            if !users.is_empty() {
                let Some(replacement) = replacement else {
                    return Err(EngineError::conflict(format!(
                        "category {} is used by zones: {}",
                        category_id,
                        users.join(", ")
                    )));
                };
                if replacement == category_id || layout.category(replacement).is_none() {
                    return Err(EngineError::validation(format!(
                        "replacement category {} is not a valid target",
                        replacement
                    )));
                }
                for record in layout.zones.iter_mut() {
                    if record.zone.category_id.as_deref() == Some(category_id) {
                        record.zone.category_id = Some(replacement.to_string());
                    }
                }
            }
            layout.categories.retain(|c| c.id != category_id);
            Ok(())
        })
        .await
        .map(|(layout, _)| layout)
    }

    pub async fn add_zone(&self, venue_id: Uuid, zone: Zone) -> EngineResult<ZoneRecord> {
        let placements = geometry::generate(&zone, self.padding)?;
        let zone_id = zone.id.clone();
        let (layout, _) = self
            .edit(venue_id, |layout| {
                if layout.zone(&zone.id).is_some() {
                    return Err(EngineError::conflict(format!("zone {} already exists", zone.id)));
                }
                check_category_ref(layout, &zone)?;
                layout.zones.push(ZoneRecord::new(zone, placements));
                Ok(())
            })
            .await?;
        zone_record(&layout, &zone_id)
    }

    /// Меняет параметры зоны. Места перегенерируются, только если изменилась
    /// геометрия рассадки; правка цены или категории id мест не трогает.
    pub async fn update_zone(
        &self,
        venue_id: Uuid,
        zone: Zone,
    ) -> EngineResult<(ZoneRecord, RegenerationReport)> {
        let placements = geometry::generate(&zone, self.padding)?;
        let zone_id = zone.id.clone();
        let (layout, report) = self
            .edit(venue_id, |layout| {
                check_category_ref(layout, &zone)?;
                let record = layout
                    .zone_mut(&zone.id)
                    .ok_or_else(|| EngineError::not_found("zone", &zone.id))?;
                let regenerate = record.zone.seating_changed(&zone);
                record.zone = zone;
                let report = if regenerate {
                    record.regenerate(placements)
                } else {
                    RegenerationReport { kept: record.seats.len(), ..Default::default() }
                };
                Ok(report)
            })
            .await?;

        if report.added > 0 || report.removed > 0 {
            debug!(
                "Zone {} regenerated: kept={} added={} removed={} overrides_dropped={}",
                zone_id, report.kept, report.added, report.removed, report.overrides_dropped
            );
        }
        Ok((zone_record(&layout, &zone_id)?, report))
    }

    pub async fn delete_zone(&self, venue_id: Uuid, zone_id: &str) -> EngineResult<VenueLayout> {
        self.edit(venue_id, |layout| {
            let before = layout.zones.len();
            layout.zones.retain(|r| r.zone.id != zone_id);
            if layout.zones.len() == before {
                return Err(EngineError::not_found("zone", zone_id));
            }
            Ok(())
        })
        .await
        .map(|(layout, _)| layout)
    }

    /// Ручная цена места; `None` снимает переопределение.
    pub async fn set_seat_override(
        &self,
        venue_id: Uuid,
        zone_id: &str,
        key: SeatKey,
        price_cents: Option<i64>,
    ) -> EngineResult<ZoneRecord> {
        if price_cents.is_some_and(|p| p < 0) {
            return Err(EngineError::validation("seat price must not be negative"));
        }
        let (layout, _) = self
            .edit(venue_id, |layout| {
                layout
                    .zone_mut(zone_id)
                    .ok_or_else(|| EngineError::not_found("zone", zone_id))?
                    .set_override(key, price_cents)
            })
            .await?;
        zone_record(&layout, zone_id)
    }

    /// Снимок мест схемы в инвентарь события. Координаты переводятся в систему площадки.
    pub async fn publish(&self, venue_id: Uuid, event_id: i64) -> EngineResult<usize> {
        if event_id <= 0 {
            return Err(EngineError::validation("event_id must be positive"));
        }
        let layout = self.get_venue(venue_id).await?;
        layout.ensure_unique_seat_ids()?;
        if layout.seat_count() == 0 {
            return Err(EngineError::validation(format!("venue {} has no seats", venue_id)));
        }

        let seats: Vec<InventorySeat> = layout
            .seats()
            .map(|(zone, seat)| {
                let position = zone.to_venue(seat.position);
                InventorySeat {
                    event_id,
                    seat_id: seat.id.clone(),
                    zone_id: seat.zone_id.clone(),
                    row_label: seat.row_label.clone(),
                    number: seat.number as i32,
                    label: seat.label.clone(),
                    x: position.x,
                    y: position.y,
                    category_id: seat.category_id.clone(),
                    price_cents: seat.price_cents,
                    status: SeatStatus::Available,
                    hold_id: None,
                    held_by: None,
                    held_until: None,
                    booking_id: None,
                }
            })
            .collect();

        let count = self.inventory.publish(event_id, seats).await?;
        self.cache.invalidate_seat_map(event_id).await;
        info!(
            "Event {} published from venue {} v{} with {} seats",
            event_id, venue_id, layout.version, count
        );
        Ok(count)
    }

    async fn edit<T, F>(&self, venue_id: Uuid, apply: F) -> EngineResult<(VenueLayout, T)>
    where
        F: FnOnce(&mut VenueLayout) -> EngineResult<T>,
    {
        let mut layout = self.get_venue(venue_id).await?;
        let expected_version = layout.version;
        let outcome = apply(&mut layout)?;
        layout.reprice();
        layout.ensure_unique_seat_ids()?;
        layout.touch(self.clock.now());
        self.repo.save(&layout, expected_version).await?;
        Ok((layout, outcome))
    }
}

fn check_category_ref(layout: &VenueLayout, zone: &Zone) -> EngineResult<()> {
    match zone.category_id.as_deref() {
        Some(id) if layout.category(id).is_none() => Err(EngineError::validation(format!(
            "zone {} references unknown category {}",
            zone.id, id
        ))),
        _ => Ok(()),
    }
}

fn zone_record(layout: &VenueLayout, zone_id: &str) -> EngineResult<ZoneRecord> {
    layout
        .zone(zone_id)
        .cloned()
        .ok_or_else(|| EngineError::not_found("zone", zone_id))
}
