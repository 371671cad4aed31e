use serde::{Deserialize, Serialize};

/// `POST /api/promo/verify` body, or the `token` / `productId` query
/// parameters of the `GET` form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
}

impl VerifyRequest {
    /// Both fields, if present and non-empty.
    pub fn parts(&self) -> Option<(&str, &str)> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        let product_id = self.product_id.as_deref().filter(|p| !p.is_empty())?;
        Some((token, product_id))
    }
}

/// Verification outcome. Carries no reason: every failure looks
/// the same from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub pct: f64,
}

impl VerifyResponse {
    pub fn accepted(pct: f64) -> Self {
        Self { valid: true, pct }
    }

    pub fn rejected() -> Self {
        Self {
            valid: false,
            pct: 0.0,
        }
    }
}
