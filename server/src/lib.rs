use std::sync::Arc;

use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

use promo_shared::promo::PromoCodec;
use promo_shared::types::AppConfig;

pub mod database;
pub mod handlers;
pub mod pricing;
pub mod server;
pub mod tower_middle;

use tower_middle::security::metrics::PromoMetrics;

/// Per-request application state. Cheap to clone: everything inside is
/// reference counted.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: PromoCodec,
    pub db: SqlitePool,
    pub metrics: PromoMetrics,
}

impl AppState {
    /// `secret` is the already-resolved signing secret; the codec never
    /// reads it from the environment itself.
    pub fn new(config: AppConfig, secret: &str, db: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            codec: PromoCodec::new(secret),
            db,
            metrics: PromoMetrics::new(),
        }
    }
}

/// Install the global `fmt` subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
