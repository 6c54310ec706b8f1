use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand_core::TryCryptoRng;

use crate::token::{TokenError, PRINCIPAL_LEN, URL_SAFE_LENIENT};

/// Authenticated identity carried by a session token.
///
/// The identifier is the unpadded URL-safe base64 form of 16 raw bytes
/// (22 characters). Equality is by identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    id: String,
    raw: [u8; PRINCIPAL_LEN],
}

impl Principal {
    /// Parse an identifier; a padded form is accepted and stored unpadded.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TokenError> {
        let decoded = URL_SAFE_LENIENT.decode(id.as_ref())?;
        let raw: [u8; PRINCIPAL_LEN] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| TokenError::PrincipalLength(decoded.len()))?;
        Ok(Self::from_bytes(raw))
    }

    pub fn from_bytes(raw: [u8; PRINCIPAL_LEN]) -> Self {
        Self { id: URL_SAFE_NO_PAD.encode(raw), raw }
    }

    /// Mint a new random identifier.
    pub fn generate<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<Self, TokenError> {
        let mut raw = [0u8; PRINCIPAL_LEN];
        rng.try_fill_bytes(&mut raw).map_err(|e| TokenError::Entropy(e.to_string()))?;
        Ok(Self::from_bytes(raw))
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_LEN] { &self.raw }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Principal").field(&self.id).finish()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.id) }
}

impl std::str::FromStr for Principal {
    type Err = TokenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Principal::new(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_22_char_identifiers() {
        let p = Principal::new("n0URmCU1_KkkygLn9-1wlQ").unwrap();
        assert_eq!(p.id(), "n0URmCU1_KkkygLn9-1wlQ");
        assert_eq!(Principal::from_bytes(*p.as_bytes()), p);
    }

    #[test]
    fn padded_identifier_is_canonicalised() {
        let p = Principal::new("n0URmCU1_KkkygLn9-1wlQ==").unwrap();
        assert_eq!(p.id(), "n0URmCU1_KkkygLn9-1wlQ");
        assert_eq!(p, Principal::new("n0URmCU1_KkkygLn9-1wlQ").unwrap());
    }

    #[test]
    fn rejects_wrong_size_or_alphabet() {
        assert!(matches!(Principal::new("user-123"), Err(TokenError::PrincipalLength(6)) | Err(TokenError::Base64(_))));
        assert!(matches!(Principal::new("AAAAAAAAAAAAAAAAAAAAAAAA"), Err(TokenError::PrincipalLength(18))));
        assert!(matches!(Principal::new("n0URmCU1/KkkygLn9+1wlQ"), Err(TokenError::Base64(_))));
        assert!(matches!(Principal::new(""), Err(TokenError::PrincipalLength(0))));
    }

    #[test]
    fn generated_ids_are_canonical() {
        let p = Principal::generate(&mut rand_core::OsRng).unwrap();
        assert_eq!(p.id().len(), 22);
        assert_eq!(Principal::new(p.id()).unwrap(), p);
        assert_eq!(p.to_string(), p.id());
    }
}
