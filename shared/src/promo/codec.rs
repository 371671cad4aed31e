use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::base64url;
use super::claims::PromoClaims;
use super::error::{MintError, PromoError};

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = '.';

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// HMAC-SHA256 over the UTF-8 bytes of the encoded payload segment.
fn compute_mac(secret: &[u8], payload_segment: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload_segment.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}

/// Length is checked first (it is public anyway), the content comparison is
/// constant-time.
fn macs_match(expected: &[u8], provided: &[u8]) -> bool {
    expected.len() == provided.len() && bool::from(expected.ct_eq(provided))
}

fn split_token(token: &str) -> Result<(&str, &str), PromoError> {
    match token.split_once(SEPARATOR) {
        Some((payload, mac))
            if !payload.is_empty() && !mac.is_empty() && !mac.contains(SEPARATOR) =>
        {
            Ok((payload, mac))
        }
        _ => Err(PromoError::Malformed),
    }
}

/// Encode and sign `claims`.
///
/// Deterministic: the same claims and secret always give the same token.
/// No range check is applied to the percentage or the expiry.
pub fn mint(claims: &PromoClaims, secret: impl AsRef<[u8]>) -> Result<String, MintError> {
    let payload_json = serde_json::to_vec(claims)?;
    let payload_segment = base64url::encode(payload_json);

    let mac = compute_mac(secret.as_ref(), &payload_segment).ok_or(MintError::Key)?;
    let mac_segment = base64url::encode(mac);

    Ok(format!("{payload_segment}{SEPARATOR}{mac_segment}"))
}

/// Verify `token` against `secret` and the current clock.
pub fn authenticate(token: &str, secret: impl AsRef<[u8]>) -> Result<PromoClaims, PromoError> {
    authenticate_at(token, secret, now_ms())
}

/// Verify `token` against `secret` as of `now_ms`.
///
/// The payload is only decoded and deserialized after the MAC has been
/// verified.
pub fn authenticate_at(
    token: &str,
    secret: impl AsRef<[u8]>,
    now_ms: i64,
) -> Result<PromoClaims, PromoError> {
    let (payload_segment, mac_segment) = split_token(token)?;

    let expected =
        compute_mac(secret.as_ref(), payload_segment).ok_or(PromoError::BadSignature)?;
    let provided = base64url::decode(mac_segment).map_err(|_| PromoError::BadSignature)?;

    if !macs_match(&expected, &provided) {
        return Err(PromoError::BadSignature);
    }

    let payload_json = base64url::decode(payload_segment).map_err(|_| PromoError::BadPayload)?;
    let claims: PromoClaims =
        serde_json::from_slice(&payload_json).map_err(|_| PromoError::BadPayload)?;

    if !claims.has_required_fields() {
        return Err(PromoError::BadPayload);
    }

    if claims.is_expired_at(now_ms) {
        return Err(PromoError::Expired);
    }

    Ok(claims)
}

/// Holds the process-wide signing secret so call sites don't pass it around.
///
/// Cheap to clone; the secret is shared read-only.
#[derive(Clone)]
pub struct PromoCodec {
    secret: Arc<[u8]>,
}

impl PromoCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
        }
    }

    pub fn mint(&self, claims: &PromoClaims) -> Result<String, MintError> {
        mint(claims, &self.secret)
    }

    pub fn authenticate(&self, token: &str) -> Result<PromoClaims, PromoError> {
        authenticate(token, &self.secret)
    }

    pub fn authenticate_at(&self, token: &str, now_ms: i64) -> Result<PromoClaims, PromoError> {
        authenticate_at(token, &self.secret, now_ms)
    }
}

impl fmt::Debug for PromoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromoCodec")
            .field("secret", &"<redacted>")
            .finish()
    }
}
