use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::identity::Principal;

use super::{TokenError, XorKey};

pub const TIME_LEN: usize = 8;
pub const PRINCIPAL_LEN: usize = 16;
pub const TOKEN_LEN: usize = TIME_LEN + PRINCIPAL_LEN;

/// Largest tolerated gap between a token's issue time and the verifier's clock.
pub const MAX_CLOCK_SKEW_MS: i64 = 5_000;

// Written without padding; re-padded input is tolerated.
pub(crate) const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    pub issued_at_ms: i64,
    pub principal: Principal,
}

impl StoredToken {
    pub fn new(principal: Principal, issued_at_ms: i64) -> Self {
        Self { issued_at_ms, principal }
    }

    pub fn expires_at_ms(&self, max_age_seconds: i64) -> i64 {
        self.issued_at_ms.saturating_add(max_age_seconds.saturating_mul(1000))
    }

    /// A token issued exactly `max_age_seconds` ago is already expired.
    pub fn is_expired(&self, max_age_seconds: i64, now_ms: i64) -> bool {
        self.expires_at_ms(max_age_seconds) <= now_ms
    }

    /// Issued further ahead of `now_ms` than [`MAX_CLOCK_SKEW_MS`]; never minted by this server.
    pub fn is_from_future(&self, now_ms: i64) -> bool {
        self.issued_at_ms > now_ms.saturating_add(MAX_CLOCK_SKEW_MS)
    }
}

pub fn now_millis() -> i64 { chrono::Utc::now().timestamp_millis() }

/// Encode a fresh token for `principal`, stamped with the current time.
pub fn encode(principal: &Principal, key: &XorKey) -> String {
    encode_at(principal, key, now_millis())
}

pub fn encode_at(principal: &Principal, key: &XorKey, issued_at_ms: i64) -> String {
    let mut buf = [0u8; TOKEN_LEN];
    buf[..TIME_LEN].copy_from_slice(&issued_at_ms.to_be_bytes());
    buf[TIME_LEN..].copy_from_slice(principal.as_bytes());
    key.apply(&mut buf);
    URL_SAFE_LENIENT.encode(buf)
}

/// Decode a cookie value. Any malformed input is a [`TokenError`]; callers
/// treat it as "no session".
pub fn decode(value: &str, key: &XorKey) -> Result<StoredToken, TokenError> {
    let raw = URL_SAFE_LENIENT.decode(value)?;
    let mut buf: [u8; TOKEN_LEN] = raw.as_slice().try_into().map_err(|_| TokenError::Length(raw.len()))?;
    key.apply(&mut buf);

    let mut time = [0u8; TIME_LEN];
    time.copy_from_slice(&buf[..TIME_LEN]);
    let mut id = [0u8; PRINCIPAL_LEN];
    id.copy_from_slice(&buf[TIME_LEN..]);

    Ok(StoredToken {
        issued_at_ms: i64::from_be_bytes(time),
        principal: Principal::from_bytes(id),
    })
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod codec_tests;
