pub mod checkout;
pub mod promo;
pub mod routes;
pub mod utils;

pub use routes::{Router, build_router};
