use std::fmt;

use serde::{Deserialize, Serialize};

/// The authenticated payload carried by a promo token.
///
/// Serialized with the short keys used on the wire (`pid`, `pct`, `exp`,
/// `oid`, `iat`), in that order. Fields are private: a minted claim set is
/// never edited in place, a new token means a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoClaims {
    /// Product the discount applies to.
    #[serde(rename = "pid")]
    product_id: String,

    /// Discount percentage. Intended range is `[0, 100]` but the codec
    /// carries whatever it is given; see [`PromoClaims::clamped_percent`].
    #[serde(rename = "pct")]
    percent: f64,

    /// Absolute expiry, epoch milliseconds.
    #[serde(rename = "exp")]
    expires_at_ms: i64,

    /// Originating order / payment reference. Informational only.
    #[serde(rename = "oid", default, skip_serializing_if = "Option::is_none")]
    order_id: Option<String>,

    /// Issuance timestamp, epoch milliseconds. Informational only.
    #[serde(rename = "iat", default)]
    issued_at_ms: i64,
}

impl PromoClaims {
    pub fn new(
        product_id: impl Into<String>,
        percent: f64,
        expires_at_ms: i64,
        issued_at_ms: i64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            percent,
            expires_at_ms,
            order_id: None,
            issued_at_ms,
        }
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn expires_at_ms(&self) -> i64 {
        self.expires_at_ms
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn issued_at_ms(&self) -> i64 {
        self.issued_at_ms
    }

    /// `true` once `now_ms` is strictly past the expiry instant.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }

    /// Exact product-id match. Callers treat a mismatch the same way as an
    /// invalid token.
    pub fn applies_to(&self, product_id: &str) -> bool {
        self.product_id == product_id
    }

    /// The percentage clamped to `[0, 100]`, with NaN mapped to 0.
    ///
    /// The codec does not validate the range; anything doing pricing math
    /// must go through this.
    pub fn clamped_percent(&self) -> f64 {
        if self.percent.is_nan() {
            return 0.0;
        }
        self.percent.clamp(0.0, 100.0)
    }

    /// Required-field check run after a successful MAC verification.
    pub(crate) fn has_required_fields(&self) -> bool {
        !self.product_id.is_empty()
    }
}

impl fmt::Display for PromoClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "product_id={}, percent={}, expires_at_ms={}, order_id={:?}",
            self.product_id, self.percent, self.expires_at_ms, self.order_id
        )
    }
}
