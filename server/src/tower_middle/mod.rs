//! Tower middleware
//!
//! - request timeouts wrapped around the router
//! - promo counters shared through `AppState`
pub mod hyper_to_tower_adapter;
pub mod security;
pub mod tower_timeout_handler;

pub use hyper_to_tower_adapter::HyperToTowerAdapter;
pub use security::metrics::PromoMetrics;
pub use tower_timeout_handler::{TimeoutLayer, TimeoutService};
