use std::fmt;

use rand_core::TryCryptoRng;

use super::{TokenError, TOKEN_LEN};

/// Same-length XOR keystream for the session token.
///
/// The key is always exactly [`TOKEN_LEN`] bytes, so the transform never
/// sees operands of different lengths.
#[derive(Clone, PartialEq, Eq)]
pub struct XorKey {
    key: [u8; TOKEN_LEN],
}

impl XorKey {
    pub fn new(key: [u8; TOKEN_LEN]) -> Self { Self { key } }

    pub fn from_slice(key: &[u8]) -> Result<Self, TokenError> {
        let key: [u8; TOKEN_LEN] = key.try_into().map_err(|_| TokenError::KeyLength {
            expected: TOKEN_LEN,
            actual: key.len(),
        })?;
        Ok(Self { key })
    }

    /// Parse a hex key (upper or lower case, 48 digits).
    pub fn from_hex(digits: &str) -> Result<Self, TokenError> {
        hex::decode(digits.trim())
            .map_err(|e| TokenError::Hex(e.to_string()))
            .and_then(|bytes| Self::from_slice(&bytes))
    }

    /// Draw a fresh key from the given cryptographically secure source.
    pub fn generate<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<Self, TokenError> {
        let mut key = [0u8; TOKEN_LEN];
        rng.try_fill_bytes(&mut key).map_err(|e| TokenError::Entropy(e.to_string()))?;
        Ok(Self { key })
    }

    pub fn bytes(&self) -> [u8; TOKEN_LEN] { self.key }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.key)
    }

    pub fn byte_length(&self) -> usize { TOKEN_LEN }

    pub fn bit_length(&self) -> usize { TOKEN_LEN * 8 }

    /// XOR `data` in place. Applying twice restores the input.
    pub fn apply(&self, data: &mut [u8; TOKEN_LEN]) {
        for (d, k) in data.iter_mut().zip(self.key.iter()) {
            *d ^= k;
        }
    }

    pub fn apply_slice(&self, data: &mut [u8]) -> Result<(), TokenError> {
        let actual = data.len();
        let data: &mut [u8; TOKEN_LEN] = data
            .try_into()
            .map_err(|_| TokenError::KeyLength { expected: TOKEN_LEN, actual })?;
        self.apply(data);
        Ok(())
    }
}

// Never print key material.
impl fmt::Debug for XorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XorKey").field("bits", &self.bit_length()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_key() -> XorKey {
        let mut k = [0u8; TOKEN_LEN];
        for (i, b) in k.iter_mut().enumerate() { *b = (i as u8).wrapping_mul(37).wrapping_add(11); }
        XorKey::new(k)
    }

    #[test]
    fn apply_twice_restores_input() {
        let key = fixed_key();
        let original: [u8; TOKEN_LEN] = *b"0123456789abcdefghijklmn";
        let mut data = original;
        key.apply(&mut data);
        assert_ne!(data, original);
        key.apply(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn apply_slice_rejects_other_lengths() {
        let key = fixed_key();
        let mut short = vec![0u8; 22];
        match key.apply_slice(&mut short) {
            Err(TokenError::KeyLength { expected, actual }) => {
                assert_eq!(expected, 24);
                assert_eq!(actual, 22);
            }
            other => panic!("expected KeyLength, got {:?}", other),
        }
        assert!(short.iter().all(|b| *b == 0), "data must be untouched on failure");
    }

    #[test]
    fn hex_round_trip_and_case() {
        let key = fixed_key();
        let hex = key.to_hex();
        assert_eq!(hex.len(), 48);
        assert_eq!(XorKey::from_hex(&hex).unwrap(), key);
        assert_eq!(XorKey::from_hex(&hex.to_lowercase()).unwrap(), key);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(matches!(XorKey::from_hex("abc"), Err(TokenError::Hex(_))));
        assert!(matches!(XorKey::from_hex(&"zz".repeat(24)), Err(TokenError::Hex(_))));
        assert!(matches!(XorKey::from_hex("+0"), Err(TokenError::Hex(_))));
        assert!(matches!(XorKey::from_hex(&"00".repeat(16)), Err(TokenError::KeyLength { actual: 16, .. })));
    }

    #[test]
    fn generated_keys_differ() {
        let a = XorKey::generate(&mut rand_core::OsRng).unwrap();
        let b = XorKey::generate(&mut rand_core::OsRng).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.bit_length(), 192);
    }

    #[test]
    fn debug_hides_key_bytes() {
        let key = fixed_key();
        let dbg = format!("{:?}", key);
        assert!(!dbg.contains(&key.to_hex()));
        assert!(dbg.contains("192"));
    }
}
