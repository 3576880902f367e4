pub mod cache;
pub mod clock;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod geometry;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;
pub mod storage;

use std::sync::Arc;

use cache::CacheService;
use clock::{Clock, SystemClock};
use services::{BookingService, HoldService, InventoryService, LayoutService};
use storage::{
    InventoryStore, LayoutRepository, MemoryInventoryStore, MemoryLayoutRepository,
    PgInventoryStore, PgLayoutRepository,
};

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub layouts: LayoutService,
    pub inventory: InventoryService,
    pub holds: Arc<HoldService>,
    pub bookings: BookingService,
}

impl AppState {
    /// Сборка сервисов поверх заданных хранилищ.
    pub fn from_parts(
        config: config::Config,
        layout_repo: Arc<dyn LayoutRepository>,
        store: Arc<dyn InventoryStore>,
        cache: CacheService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let layouts = LayoutService::new(
            layout_repo,
            store.clone(),
            cache.clone(),
            clock.clone(),
            config.seating.zone_padding,
        );
        let inventory = InventoryService::new(store.clone(), cache, clock.clone());
        let holds = Arc::new(HoldService::new(store.clone(), clock.clone(), &config.seating));
        let bookings = BookingService::new(store, clock);
        Self { config, layouts, inventory, holds, bookings }
    }

    /// Postgres-хранилища и опциональный Redis-кеш.
    pub fn with_database(
        config: config::Config,
        db: &database::Database,
        cache: CacheService,
    ) -> Arc<Self> {
        Arc::new(Self::from_parts(
            config,
            Arc::new(PgLayoutRepository::new(db.pool.clone())),
            Arc::new(PgInventoryStore::new(db.pool.clone())),
            cache,
            Arc::new(SystemClock),
        ))
    }

    /// Всё в памяти процесса. Для тестов и локального запуска без базы.
    pub fn in_memory(config: config::Config, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self::from_parts(
            config,
            Arc::new(MemoryLayoutRepository::new()),
            Arc::new(MemoryInventoryStore::new()),
            CacheService::disabled(),
            clock,
        ))
    }
}
