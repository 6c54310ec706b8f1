use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::identity::RouteAuth;
use crate::token::TokenError;

use super::{RealmConfig, RealmConfigFile};

type Snapshot = Arc<HashMap<String, Arc<RealmConfig>>>;

/// Realm name -> configuration.
///
/// Readers clone an immutable snapshot; writers build a new map and swap it
/// in, so lookups never observe a half-applied registration.
#[derive(Debug, Default)]
pub struct RealmRegistry {
    realms: RwLock<Snapshot>,
}

impl RealmRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn from_files(files: Vec<RealmConfigFile>) -> Result<Self, TokenError> {
        let reg = Self::new();
        for f in files {
            reg.register(RealmConfig::try_from(f)?);
        }
        Ok(reg)
    }

    /// Store `config` under its realm name, replacing any previous entry.
    pub fn register(&self, config: RealmConfig) -> &Self {
        let name = config.realm_name.clone();
        let mut guard = self.realms.write();
        let mut next: HashMap<String, Arc<RealmConfig>> = (**guard).clone();
        if next.insert(name.clone(), Arc::new(config)).is_some() {
            warn!(target: "realm", "realm '{}' re-registered; previous config replaced", name);
        } else {
            info!(target: "realm", "registered realm '{}'", name);
        }
        *guard = Arc::new(next);
        self
    }

    pub fn lookup(&self, name: &str) -> AppResult<Arc<RealmConfig>> {
        self.realms.read().get(name).cloned().ok_or_else(|| AppError::realm_not_found(name))
    }

    pub fn snapshot(&self) -> Snapshot { self.realms.read().clone() }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.realms.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize { self.realms.read().len() }

    pub fn is_empty(&self) -> bool { self.realms.read().is_empty() }

    /// Startup check: every declared route must name a registered realm.
    pub fn validate_routes(&self, routes: &[RouteAuth]) -> AppResult<()> {
        let snap = self.snapshot();
        match routes.iter().find(|r| !snap.contains_key(&r.realm)) {
            Some(missing) => Err(AppError::realm_not_found(&missing.realm)),
            None => Ok(()),
        }
    }
}
