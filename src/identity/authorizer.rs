use std::collections::HashSet;

use parking_lot::RwLock;

use super::Principal;

/// Route marker: which realm guards an endpoint and whether a session is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteAuth {
    pub realm: String,
    pub optional: bool,
}

impl RouteAuth {
    pub fn required(realm: impl Into<String>) -> Self { Self { realm: realm.into(), optional: false } }
    pub fn optional(realm: impl Into<String>) -> Self { Self { realm: realm.into(), optional: true } }
}

/// Policy hook consulted once per request with a decoded, non-expired principal.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, principal: &Principal, requirement: &RouteAuth) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn(&Principal, &RouteAuth) -> bool + Send + Sync,
{
    fn is_authorized(&self, principal: &Principal, requirement: &RouteAuth) -> bool {
        self(principal, requirement)
    }
}

/// Accepts every structurally valid, unexpired session.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self, _principal: &Principal, _requirement: &RouteAuth) -> bool { true }
}

/// Explicit set of accepted principals; can be revoked at runtime.
#[derive(Debug, Default)]
pub struct AllowList {
    allowed: RwLock<HashSet<Principal>>,
}

impl AllowList {
    pub fn new<I: IntoIterator<Item = Principal>>(principals: I) -> Self {
        Self { allowed: RwLock::new(principals.into_iter().collect()) }
    }

    pub fn allow(&self, principal: Principal) -> bool { self.allowed.write().insert(principal) }

    pub fn revoke(&self, principal: &Principal) -> bool { self.allowed.write().remove(principal) }
}

impl Authorizer for AllowList {
    fn is_authorized(&self, principal: &Principal, _requirement: &RouteAuth) -> bool {
        self.allowed.read().contains(principal)
    }
}
