use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub seating: SeatingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

// Настройки базы данных. Без DATABASE_URL сервис работает на in-memory хранилищах.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub pool_size: u32,
}

// Настройки Redis (кеш схемы зала, опционально)
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Option<String>,
    pub seat_map_ttl_seconds: u64,
}

// Параметры движка рассадки
#[derive(Debug, Clone, Deserialize)]
pub struct SeatingConfig {
    /// Время жизни hold. 10 минут по умолчанию.
    pub hold_ttl_seconds: i64,
    /// Период фоновой очистки просроченных hold.
    pub sweep_interval_seconds: u64,
    /// Максимум мест в одном hold.
    pub max_seats_per_hold: usize,
    /// Отступ от края зоны при генерации мест.
    pub zone_padding: f64,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            hold_ttl_seconds: 600,
            sweep_interval_seconds: 60,
            max_seats_per_hold: 20,
            zone_padding: crate::geometry::DEFAULT_PADDING,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

fn var_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => {
                return Err(ConfigError::Invalid { name: "LOG_FORMAT", value: other.to_string() })
            }
        };

        let seating = SeatingConfig {
            hold_ttl_seconds: var_or("HOLD_TTL_SECONDS", 600)?,
            sweep_interval_seconds: var_or("HOLD_SWEEP_INTERVAL_SECONDS", 60)?,
            max_seats_per_hold: var_or("MAX_SEATS_PER_HOLD", 20)?,
            zone_padding: var_or("ZONE_PADDING", crate::geometry::DEFAULT_PADDING)?,
        };
        if seating.hold_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid {
                name: "HOLD_TTL_SECONDS",
                value: seating.hold_ttl_seconds.to_string(),
            });
        }
        if !seating.zone_padding.is_finite() || seating.zone_padding < 0.0 {
            return Err(ConfigError::Invalid {
                name: "ZONE_PADDING",
                value: seating.zone_padding.to_string(),
            });
        }

        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: var_or("PORT", 8000)?,
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "venue_seating=debug,tower_http=debug".to_string()),
                log_format,
            },
            database: DatabaseConfig {
                url: optional_var("DATABASE_URL"),
                pool_size: var_or("DB_POOL_SIZE", 20)?,
            },
            redis: RedisConfig {
                url: optional_var("REDIS_URL"),
                seat_map_ttl_seconds: var_or("SEAT_MAP_CACHE_TTL_SECONDS", 86400)?,
            },
            seating,
        })
    }

    /// Конфигурация для тестов и локального запуска без внешних сервисов.
    pub fn in_memory() -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
                rust_log: "venue_seating=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            database: DatabaseConfig { url: None, pool_size: 1 },
            redis: RedisConfig { url: None, seat_map_ttl_seconds: 86400 },
            seating: SeatingConfig::default(),
        }
    }
}
