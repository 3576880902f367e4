use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::cache::CacheService;
use crate::models::SeatMapEntry;

fn seat_map_key(event_id: i64) -> String {
    format!("seatmap:{}", event_id)
}

impl CacheService {
    // Схема мест события из кеша; любая ошибка Redis = промах
    pub async fn get_seat_map(&self, event_id: i64) -> Option<Vec<SeatMapEntry>> {
        let redis = self.redis.as_ref()?;
        let mut conn = redis.conn.clone();
        let data: Option<String> = match conn.get(seat_map_key(event_id)).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Seat map cache read failed for event {}: {}", event_id, e);
                return None;
            }
        };
        match serde_json::from_str(&data?) {
            Ok(entries) => {
                debug!("Seat map cache hit for event {}", event_id);
                Some(entries)
            }
            Err(e) => {
                warn!("Corrupted seat map cache entry for event {}: {}", event_id, e);
                None
            }
        }
    }

    pub async fn save_seat_map(&self, event_id: i64, entries: &[SeatMapEntry]) {
        let Some(redis) = self.redis.as_ref() else { return };
        let data = match serde_json::to_string(entries) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize seat map for event {}: {}", event_id, e);
                return;
            }
        };
        let mut conn = redis.conn.clone();
        let result: redis::RedisResult<()> =
            conn.set_ex(seat_map_key(event_id), data, self.ttl_seconds).await;
        if let Err(e) = result {
            warn!("Seat map cache write failed for event {}: {}", event_id, e);
        }
    }

    pub async fn invalidate_seat_map(&self, event_id: i64) {
        let Some(redis) = self.redis.as_ref() else { return };
        let mut conn = redis.conn.clone();
        let result: redis::RedisResult<()> = conn.del(seat_map_key(event_id)).await;
        if let Err(e) = result {
            warn!("Seat map cache invalidation failed for event {}: {}", event_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_namespaced_by_event() {
        assert_eq!(seat_map_key(42), "seatmap:42");
    }

    #[tokio::test]
    async fn disabled_cache_always_misses() {
        let cache = CacheService::disabled();
        assert!(!cache.is_enabled());
        cache.save_seat_map(1, &[]).await;
        assert_eq!(cache.get_seat_map(1).await, None);
    }
}
