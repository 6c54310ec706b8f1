use serde::{Deserialize, Serialize};

use crate::token::{TokenError, XorKey};

pub const DEFAULT_MAX_AGE_SECONDS: i64 = 60;

fn default_max_age() -> i64 { DEFAULT_MAX_AGE_SECONDS }

/// Cookie and key settings for one realm. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmConfig {
    pub realm_name: String,
    pub cookie_name: String,
    pub cookie_path: Option<String>,
    pub cookie_domain: Option<String>,
    pub max_age_seconds: i64,
    pub key: XorKey,
}

impl RealmConfig {
    pub fn new(realm_name: impl Into<String>, cookie_name: impl Into<String>, key: XorKey) -> Self {
        Self {
            realm_name: realm_name.into(),
            cookie_name: cookie_name.into(),
            cookie_path: None,
            cookie_domain: None,
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            key,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self { self.cookie_path = Some(path.into()); self }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self { self.cookie_domain = Some(domain.into()); self }

    pub fn with_max_age(mut self, seconds: i64) -> Self { self.max_age_seconds = seconds; self }
}

/// On-disk form of a realm, with the key as 48 hex digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealmConfigFile {
    pub realm: String,
    pub cookie_name: String,
    #[serde(default)]
    pub cookie_path: Option<String>,
    #[serde(default)]
    pub cookie_domain: Option<String>,
    #[serde(default = "default_max_age")]
    pub max_age_seconds: i64,
    pub key_hex: String,
}

impl TryFrom<RealmConfigFile> for RealmConfig {
    type Error = TokenError;

    fn try_from(f: RealmConfigFile) -> Result<Self, Self::Error> {
        if f.max_age_seconds <= 0 {
            return Err(TokenError::MaxAge(f.max_age_seconds));
        }
        let key = XorKey::from_hex(&f.key_hex)?;
        Ok(RealmConfig {
            realm_name: f.realm,
            cookie_name: f.cookie_name,
            cookie_path: f.cookie_path,
            cookie_domain: f.cookie_domain,
            max_age_seconds: f.max_age_seconds,
            key,
        })
    }
}

impl From<&RealmConfig> for RealmConfigFile {
    fn from(c: &RealmConfig) -> Self {
        RealmConfigFile {
            realm: c.realm_name.clone(),
            cookie_name: c.cookie_name.clone(),
            cookie_path: c.cookie_path.clone(),
            cookie_domain: c.cookie_domain.clone(),
            max_age_seconds: c.max_age_seconds,
            key_hex: c.key.to_hex(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_and_overrides() {
        let c = RealmConfig::new("app", "sid", XorKey::new([1; 24]));
        assert_eq!(c.max_age_seconds, 60);
        assert!(c.cookie_path.is_none() && c.cookie_domain.is_none());
        let c = c.with_path("/").with_domain("example.com").with_max_age(3600);
        assert_eq!(c.cookie_path.as_deref(), Some("/"));
        assert_eq!(c.cookie_domain.as_deref(), Some("example.com"));
        assert_eq!(c.max_age_seconds, 3600);
    }

    #[test]
    fn file_form_defaults_max_age() {
        let json = format!(r#"{{"realm":"app","cookie_name":"sid","key_hex":"{}"}}"#, "0A".repeat(24));
        let f: RealmConfigFile = serde_json::from_str(&json).unwrap();
        assert_eq!(f.max_age_seconds, 60);
        let c = RealmConfig::try_from(f.clone()).unwrap();
        assert_eq!(c.key, XorKey::new([0x0A; 24]));
        assert_eq!(RealmConfigFile::from(&c), f);
    }

    #[test]
    fn file_form_rejects_short_key() {
        let f = RealmConfigFile {
            realm: "app".into(),
            cookie_name: "sid".into(),
            cookie_path: None,
            cookie_domain: None,
            max_age_seconds: 60,
            key_hex: "00".repeat(22),
        };
        assert!(matches!(RealmConfig::try_from(f), Err(TokenError::KeyLength { expected: 24, actual: 22 })));
    }

    #[test]
    fn file_form_rejects_non_positive_max_age() {
        for age in [0, -5] {
            let json = format!(r#"{{"realm":"app","cookie_name":"sid","max_age_seconds":{},"key_hex":"{}"}}"#, age, "0A".repeat(24));
            let f: RealmConfigFile = serde_json::from_str(&json).unwrap();
            assert!(matches!(RealmConfig::try_from(f), Err(TokenError::MaxAge(a)) if a == age));
        }
    }
}
