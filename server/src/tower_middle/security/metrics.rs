use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use promo_shared::promo::PromoError;
use promo_shared::types::{PromoStats, RejectionCounts};

/// Counters for promo minting and verification.
///
/// Rejections are counted per failure kind so forged-token traffic shows up
/// separately from ordinary expiry.
#[derive(Clone, Debug)]
pub struct PromoMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    minted: AtomicU64,
    verified: AtomicU64,
    malformed: AtomicU64,
    bad_signature: AtomicU64,
    bad_payload: AtomicU64,
    expired: AtomicU64,
    product_mismatch: AtomicU64,
    start_time: Instant,
}

impl Default for PromoMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PromoMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                minted: AtomicU64::new(0),
                verified: AtomicU64::new(0),
                malformed: AtomicU64::new(0),
                bad_signature: AtomicU64::new(0),
                bad_payload: AtomicU64::new(0),
                expired: AtomicU64::new(0),
                product_mismatch: AtomicU64::new(0),
                start_time: Instant::now(),
            }),
        }
    }

    pub fn record_minted(&self) {
        self.inner.minted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verified(&self) {
        self.inner.verified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_product_mismatch(&self) {
        self.inner.product_mismatch.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self, err: PromoError) {
        let counter = match err {
            PromoError::Malformed => &self.inner.malformed,
            PromoError::BadSignature => &self.inner.bad_signature,
            PromoError::BadPayload => &self.inner.bad_payload,
            PromoError::Expired => &self.inner.expired,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PromoStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);

        PromoStats {
            minted: load(&self.inner.minted),
            verified: load(&self.inner.verified),
            rejected: RejectionCounts {
                malformed: load(&self.inner.malformed),
                bad_signature: load(&self.inner.bad_signature),
                bad_payload: load(&self.inner.bad_payload),
                expired: load(&self.inner.expired),
            },
            product_mismatch: load(&self.inner.product_mismatch),
            uptime_secs: self.inner.start_time.elapsed().as_secs(),
        }
    }
}
