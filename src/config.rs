//! Process configuration: environment variables for the server and the
//! JSON realm file they point at.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand_core::TryCryptoRng;
use tracing::{info, warn};

use crate::realm::{RealmConfig, RealmConfigFile, RealmRegistry};
use crate::token::XorKey;

pub const ENV_HTTP_PORT: &str = "COOKIE_REALM_HTTP_PORT";
pub const ENV_REALMS: &str = "COOKIE_REALM_REALMS";
pub const DEFAULT_HTTP_PORT: u16 = 7878;

/// Realm registered when no realm file is configured.
pub const DEMO_REALM: &str = "app";
pub const DEMO_COOKIE: &str = "sid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub http_port: u16,
    pub realms_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self { Self { http_port: DEFAULT_HTTP_PORT, realms_path: None } }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim().parse::<u16>().with_context(|| format!("{} must be a port number, got '{}'", ENV_HTTP_PORT, raw))
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var(ENV_HTTP_PORT) {
            Ok(v) => parse_port(&v)?,
            Err(_) => DEFAULT_HTTP_PORT,
        };
        let realms_path = env::var_os(ENV_REALMS).filter(|v| !v.is_empty()).map(PathBuf::from);
        Ok(Self { http_port, realms_path })
    }

    /// Registry from the realm file, or a single demo realm with a fresh key.
    pub fn build_registry<R: TryCryptoRng + ?Sized>(&self, rng: &mut R) -> Result<RealmRegistry> {
        match &self.realms_path {
            Some(path) => {
                let files = load_realm_files(path)?;
                let registry = RealmRegistry::from_files(files)
                    .with_context(|| format!("While building realms from {}", path.display()))?;
                info!(target: "startup", "loaded {} realm(s) from {}", registry.len(), path.display());
                Ok(registry)
            }
            None => {
                let key = XorKey::generate(rng).context("While generating demo realm key")?;
                warn!(
                    target: "startup",
                    "{} not set; registering demo realm '{}' with a generated key (sessions will not survive a restart)",
                    ENV_REALMS, DEMO_REALM
                );
                let registry = RealmRegistry::new();
                registry.register(RealmConfig::new(DEMO_REALM, DEMO_COOKIE, key).with_path("/"));
                Ok(registry)
            }
        }
    }
}

pub fn load_realm_files(path: &Path) -> Result<Vec<RealmConfigFile>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read realm file: {}", path.display()))?;
    let files: Vec<RealmConfigFile> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse realm file: {}", path.display()))?;
    Ok(files)
}
