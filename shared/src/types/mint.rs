use serde::{Deserialize, Serialize};

use super::json_error::ErrorResponse;

// ---------------------------------------------------------------------------
// Mint wire types
// ---------------------------------------------------------------------------

/// `POST /api/promo/mint` body.
///
/// Fields are optional at the serde level so a missing field becomes a
/// `MISSING_FIELD` response instead of a generic parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    /// Requested discount. Falls back to `promo.default_percent`.
    #[serde(default)]
    pub pct: Option<f64>,
}

impl MintRequest {
    /// The payment reference, if present and non-empty.
    pub fn payment_intent_id(&self) -> Result<&str, MintRequestError> {
        non_empty(&self.payment_intent_id, "paymentIntentId")
    }

    /// The product id, if present and non-empty.
    pub fn product_id(&self) -> Result<&str, MintRequestError> {
        non_empty(&self.product_id, "productId")
    }
}

fn non_empty<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, MintRequestError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| MintRequestError::MissingField(field.to_string()))
}

/// Successful mint: the token plus its absolute expiry in epoch ms.
#[derive(Debug, Serialize, Deserialize)]
pub struct MintResponse {
    pub token: String,
    pub exp: i64,
}

// ---------------------------------------------------------------------------
// Mint errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum MintRequestError {
    MissingField(String),
    InvalidBody,
    OrderNotFound,
    OrderNotPaid,
    PromoWindowExpired,
    DatabaseError,
    InternalError,
}

impl MintRequestError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidBody => "INVALID_BODY",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::OrderNotPaid => "ORDER_NOT_PAID",
            Self::PromoWindowExpired => "PROMO_WINDOW_EXPIRED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::InvalidBody => "Request body is not valid JSON".to_string(),
            Self::OrderNotFound => "Order not found".to_string(),
            Self::OrderNotPaid => "Order not paid".to_string(),
            Self::PromoWindowExpired => "Promo window expired".to_string(),
            Self::DatabaseError => "Database error occurred".to_string(),
            Self::InternalError => "An internal error occurred".to_string(),
        }
    }

    /// HTTP status the mint endpoint answers with.
    pub fn status(&self) -> u16 {
        match self {
            Self::OrderNotFound => 404,
            Self::DatabaseError | Self::InternalError => 500,
            _ => 400,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_code(), &self.to_message())
    }
}
