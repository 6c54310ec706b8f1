//! Realm configuration and the realm-name registry.

mod config;
mod registry;

pub use config::{RealmConfig, RealmConfigFile, DEFAULT_MAX_AGE_SECONDS};
pub use registry::RealmRegistry;
