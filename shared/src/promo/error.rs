use thiserror::Error;

/// Why a token was not accepted.
///
/// These are for logs and counters. They must never reach the client: the
/// HTTP layer collapses all of them into "promotion not applied".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromoError {
    /// Not `<payload>.<mac>` with both segments non-empty.
    #[error("malformed promo token")]
    Malformed,

    /// MAC mismatch: tampering, wrong secret, truncation or corruption.
    #[error("promo token signature mismatch")]
    BadSignature,

    /// The MAC verified but the payload is not a valid claim set. Only a
    /// minter sharing the secret can cause this.
    #[error("authenticated promo payload is invalid")]
    BadPayload,

    /// Authentic, but past its expiry.
    #[error("promo token expired")]
    Expired,
}

impl PromoError {
    pub const ALL: [PromoError; 4] = [
        PromoError::Malformed,
        PromoError::BadSignature,
        PromoError::BadPayload,
        PromoError::Expired,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed => "MALFORMED",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::BadPayload => "BAD_PAYLOAD",
            Self::Expired => "EXPIRED",
        }
    }

    /// Failures that indicate someone handed us a forged or damaged token.
    pub fn is_tampering(&self) -> bool {
        matches!(self, Self::Malformed | Self::BadSignature)
    }
}

/// Minting failures. Neither can happen for claims built through
/// [`PromoClaims`](super::PromoClaims) with an HMAC key.
#[derive(Error, Debug)]
pub enum MintError {
    #[error("failed to serialize promo claims: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("signing key rejected by HMAC")]
    Key,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = PromoError::ALL.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), PromoError::ALL.len());
    }

    #[test]
    fn only_structural_and_signature_failures_are_tampering() {
        assert!(PromoError::Malformed.is_tampering());
        assert!(PromoError::BadSignature.is_tampering());
        assert!(!PromoError::BadPayload.is_tampering());
        assert!(!PromoError::Expired.is_tampering());
    }
}
