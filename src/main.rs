use anyhow::Context;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use venue_seating::{
    cache::CacheService,
    clock::SystemClock,
    config::{Config, LogFormat},
    controllers,
    database::Database,
    AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[cfg(feature = "seat-map-cache")]
async fn connect_cache(config: &Config) -> CacheService {
    use venue_seating::redis_client::RedisClient;

    let Some(url) = config.redis.url.as_deref() else {
        info!("REDIS_URL not set, seat map cache disabled");
        return CacheService::disabled();
    };
    match RedisClient::new(url).await {
        Ok(redis) => CacheService::new(Some(redis), config.redis.seat_map_ttl_seconds),
        Err(e) => {
            // Кеш не обязателен: без Redis карта мест читается из базы
            warn!("Redis unavailable, seat map cache disabled: {}", e);
            CacheService::disabled()
        }
    }
}

#[cfg(not(feature = "seat-map-cache"))]
async fn connect_cache(_config: &Config) -> CacheService {
    CacheService::disabled()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(&config);

    info!("Starting venue seating engine ({})", config.app.environment);

    let state = match config.database.url.clone() {
        Some(url) => {
            let db = Database::new(&url, config.database.pool_size)
                .await
                .context("failed to connect to database")?;
            db.run_migrations().await.context("failed to run migrations")?;
            let cache = connect_cache(&config).await;
            AppState::with_database(config.clone(), &db, cache)
        }
        None => {
            warn!("DATABASE_URL not set, running on in-memory storage; data is lost on restart");
            AppState::in_memory(config.clone(), Arc::new(SystemClock))
        }
    };

    #[cfg(feature = "sweeper")]
    {
        let sweeper = venue_seating::services::HoldSweeper::new(
            state.holds.clone(),
            std::time::Duration::from_secs(config.seating.sweep_interval_seconds.max(1)),
        );
        tokio::spawn(sweeper.run());
    }

    let app = Router::new()
        .route("/", get(|| async { "Venue Seating API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("invalid HOST/PORT")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
