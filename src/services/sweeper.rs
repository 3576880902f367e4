use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::services::holds::HoldService;

/// Фоновая очистка просроченных hold. Корректность чтений от неё не зависит,
/// она только возвращает хранимый статус к фактическому.
pub struct HoldSweeper {
    holds: Arc<HoldService>,
    interval: Duration,
}

impl HoldSweeper {
    pub fn new(holds: Arc<HoldService>, interval: Duration) -> Self {
        Self { holds, interval }
    }

    /// Один проход; ошибки хранилища логируются и не останавливают цикл.
    pub async fn sweep_once(&self) -> usize {
        match self.holds.expire_stale_holds().await {
            Ok(count) => count,
            Err(e) => {
                error!("Hold sweep failed: {}", e);
                0
            }
        }
    }

    pub async fn run(self) {
        info!("🧹 Hold sweeper started, interval {:?}", self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }
}
