pub mod mint;
pub mod stats;
pub mod verify;

pub use mint::{handle_mint, mint_for_order};
pub use stats::handle_stats;
pub use verify::{handle_verify, handle_verify_query, verify_claim};

use promo_shared::promo::PromoError;
use tracing::{debug, error, warn};

use crate::AppState;

/// Count and log a token rejection. Malformed and bad-signature tokens are
/// logged as possible tampering; a bad payload behind a valid signature
/// means a minter with our secret produced something we cannot read.
pub fn record_rejection(state: &AppState, err: PromoError, context: &str) {
    state.metrics.record_rejection(err);

    match err {
        e if e.is_tampering() => {
            warn!("Possible promo token tampering ({}): {}", context, e.code());
        }
        PromoError::BadPayload => {
            error!(
                "Promo token passed signature check but payload is invalid ({})",
                context
            );
        }
        _ => {
            debug!("Expired promo token presented ({})", context);
        }
    }
}
