pub mod json_error;
pub mod mint;
pub mod quote;
pub mod server_config;
pub mod stats;
pub mod verify;

pub use self::json_error::ErrorResponse;
pub use self::mint::{MintRequest, MintRequestError, MintResponse};
pub use self::quote::{QuoteError, QuoteItem, QuoteRequest, QuoteResponse, QuotedItem};
pub use self::server_config::*;
pub use self::stats::{PromoStats, RejectionCounts};
pub use self::verify::{VerifyRequest, VerifyResponse};
