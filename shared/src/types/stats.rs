use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of promo counters.
/// Serialized and returned by `GET /api/promo/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromoStats {
    pub minted: u64,
    pub verified: u64,
    pub rejected: RejectionCounts,
    /// Authentic tokens presented for a different product.
    pub product_mismatch: u64,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub malformed: u64,
    pub bad_signature: u64,
    pub bad_payload: u64,
    pub expired: u64,
}

impl RejectionCounts {
    pub fn total(&self) -> u64 {
        self.malformed + self.bad_signature + self.bad_payload + self.expired
    }
}
