//! Session token codec: a fixed 24-byte `{issued_at_ms, principal}` record,
//! obfuscated with a same-length XOR key and carried as URL-safe base64.
//!
//! The XOR layer is obfuscation only. It has no integrity check and is
//! malleable: flipping a ciphertext bit flips the same plaintext bit. A
//! successful decode proves shape and length, nothing more.

mod codec;
mod xor;

pub use codec::{decode, encode, encode_at, now_millis, StoredToken, MAX_CLOCK_SKEW_MS, PRINCIPAL_LEN, TIME_LEN, TOKEN_LEN};
pub use xor::XorKey;
pub(crate) use codec::URL_SAFE_LENIENT;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token is {0} bytes, expected 24")]
    Length(usize),
    #[error("not same length: key is {expected} bytes, data is {actual}")]
    KeyLength { expected: usize, actual: usize },
    #[error("principal id must decode to 16 bytes, got {0}")]
    PrincipalLength(usize),
    #[error("invalid hex key: {0}")]
    Hex(String),
    #[error("max age must be a positive number of seconds, got {0}")]
    MaxAge(i64),
    #[error("random source failed: {0}")]
    Entropy(String),
}
