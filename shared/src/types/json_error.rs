use serde::{Deserialize, Serialize};

/// Error envelope returned by every endpoint that can fail visibly.
///
/// Promo verification never uses this: a rejected token is reported as
/// [`VerifyResponse::rejected`](super::VerifyResponse::rejected).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self::new("NOT_FOUND", "Endpoint not found")
    }
}
