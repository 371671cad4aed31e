use serde::{Deserialize, Serialize};

use super::json_error::ErrorResponse;

/// `POST /api/checkout/quote` body.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<QuoteItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    /// Product id.
    pub id: String,
    pub quantity: u32,
    #[serde(default)]
    pub promo_token: Option<String>,
}

/// Server-side price of one cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedItem {
    pub id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub promo_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub items: Vec<QuotedItem>,
    pub subtotal_cents: i64,
}

impl QuoteResponse {
    pub fn from_items(items: Vec<QuotedItem>) -> Self {
        let subtotal_cents = items
            .iter()
            .map(|i| i.unit_price_cents * i64::from(i.quantity))
            .sum();
        Self {
            items,
            subtotal_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteError {
    InvalidBody,
    EmptyCart,
    ProductNotFound(String),
    DatabaseError,
}

impl QuoteError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::InvalidBody => "INVALID_BODY",
            Self::EmptyCart => "EMPTY_CART",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::InvalidBody => "Request body is not valid JSON".to_string(),
            Self::EmptyCart => "No items in cart".to_string(),
            Self::ProductNotFound(id) => format!("Product not found: {}", id),
            Self::DatabaseError => "Database error occurred".to_string(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::DatabaseError => 500,
            _ => 400,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_code(), &self.to_message())
    }
}
