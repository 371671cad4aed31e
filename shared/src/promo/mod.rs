//! Signed promotional-discount tokens.
//!
//! A token is `base64url(json(claims)) + "." + base64url(hmac_sha256(secret, payload_segment))`.
//! The MAC covers the *encoded* payload segment, and claims are only
//! deserialized once the MAC has been verified.

pub mod base64url;
pub mod claims;
pub mod codec;
pub mod error;

pub use self::claims::PromoClaims;
pub use self::codec::{PromoCodec, authenticate, authenticate_at, mint, now_ms};
pub use self::error::{MintError, PromoError};
