use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parking_lot::Mutex;

use super::{Principal, Subject};

/// Request-scoped storage shared between the session filter and the handler.
///
/// Cloning yields another handle onto the same per-request state. Subjects are
/// keyed by realm so several realms can guard one route.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: Option<String>,
    subjects: Arc<Mutex<HashMap<String, Subject>>>,
}

impl RequestContext {
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self { request_id: Some(request_id.into()), subjects: Arc::default() }
    }

    pub fn attach(&self, realm: &str, subject: Subject) {
        self.subjects.lock().insert(realm.to_string(), subject);
    }

    pub fn subject(&self, realm: &str) -> Option<Subject> {
        self.subjects.lock().get(realm).cloned()
    }

    pub fn principal(&self, realm: &str) -> Option<Principal> {
        self.subjects.lock().get(realm).and_then(|s| s.principal.clone())
    }

    /// Remove the subject; the response phase consumes it exactly once.
    pub fn take(&self, realm: &str) -> Option<Subject> {
        self.subjects.lock().remove(realm)
    }

    /// Establish a session for `principal`; the cookie is issued on the way out.
    /// Has no effect on a realm whose filter is not running for this request.
    pub fn login(&self, realm: &str, principal: Principal) -> bool {
        self.replace(realm, Subject::authenticated(principal))
    }

    /// Drop the session; a cookie sent with the request is deleted on the way out.
    pub fn logout(&self, realm: &str) -> bool {
        self.replace(realm, Subject::anonymous())
    }

    fn replace(&self, realm: &str, subject: Subject) -> bool {
        let mut subjects = self.subjects.lock();
        match subjects.get_mut(realm) {
            Some(slot) => { *slot = subject; true }
            None => false,
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<RequestContext>().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state_and_take_is_single_use() {
        let ctx = RequestContext::with_request_id("r1");
        let handle = ctx.clone();
        ctx.attach("app", Subject::authenticated(Principal::from_bytes([1; 16])));
        assert!(handle.principal("app").is_some());
        assert!(handle.take("app").is_some());
        assert!(ctx.take("app").is_none());
    }

    #[test]
    fn login_and_logout_only_touch_attached_realms() {
        let ctx = RequestContext::default();
        assert!(!ctx.login("app", Principal::from_bytes([2; 16])));
        ctx.attach("app", Subject::anonymous());
        assert!(ctx.login("app", Principal::from_bytes([2; 16])));
        assert_eq!(ctx.principal("app"), Some(Principal::from_bytes([2; 16])));
        assert!(ctx.logout("app"));
        assert_eq!(ctx.subject("app"), Some(Subject::anonymous()));
        assert!(ctx.subject("other").is_none());
    }
}
