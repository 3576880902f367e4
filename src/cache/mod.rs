//! Кеш опубликованной геометрии событий в Redis.
//!
//! Кешируется только то, что после публикации не меняется. Статусы мест
//! всегда читаются из хранилища инвентаря.

use crate::redis_client::RedisClient;

pub mod seats;

#[derive(Clone)]
pub struct CacheService {
    redis: Option<RedisClient>,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: Option<RedisClient>, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    /// Кеш без Redis: все чтения идут мимо.
    pub fn disabled() -> Self {
        Self { redis: None, ttl_seconds: 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.redis.is_some()
    }
}
