//! Session filter: the request/response lifecycle around the token codec.
//!
//! Request phase: read the realm cookie, decode it, apply expiration and the
//! authorizer, and produce a [`Subject`] (or an `Unauthorized` error for
//! mandatory routes). Response phase: re-issue the cookie for an authenticated
//! subject, or emit a deletion cookie when the client sent one the server did
//! not re-affirm.

pub mod cookie;
mod layer;

pub use layer::{cookie_auth, protect};

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::debug;

use crate::error::{challenge_for, AppError, AppResult};
use crate::identity::{Authorizer, RouteAuth, Subject};
use crate::realm::{RealmConfig, RealmRegistry};
use crate::token;

pub struct SessionFilter {
    route: RouteAuth,
    config: Arc<RealmConfig>,
    authorizer: Arc<dyn Authorizer>,
}

impl std::fmt::Debug for SessionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFilter").field("route", &self.route).field("cookie", &self.config.cookie_name).finish()
    }
}

impl SessionFilter {
    /// Resolve the route's realm now so a missing realm fails at wiring time.
    pub fn new(registry: &RealmRegistry, route: RouteAuth, authorizer: Arc<dyn Authorizer>) -> AppResult<Self> {
        let config = registry.lookup(&route.realm)?;
        Ok(Self::from_parts(route, config, authorizer))
    }

    pub fn from_parts(route: RouteAuth, config: Arc<RealmConfig>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { route, config, authorizer }
    }

    pub fn realm(&self) -> &str { &self.route.realm }

    pub fn route(&self) -> &RouteAuth { &self.route }

    pub fn config(&self) -> &RealmConfig { &self.config }

    /// Request phase.
    pub fn authenticate(&self, cookie: Option<&str>, base_uri: &str, now_ms: i64) -> AppResult<Subject> {
        let challenge = || challenge_for(self.realm(), base_uri);

        let Some(value) = cookie else {
            debug!(realm = %self.realm(), "no session cookie");
            return self.reject(AppError::missing_token(challenge()));
        };

        let stored = match token::decode(value, &self.config.key) {
            Ok(t) => t,
            Err(e) => {
                // A corrupt cookie is indistinguishable from a missing one to the client.
                let head: String = value.chars().take(8).collect();
                debug!(realm = %self.realm(), cookie_head = %head, error = %e, "unable to decode session cookie");
                return self.reject(AppError::missing_token(challenge()));
            }
        };

        if stored.is_from_future(now_ms) {
            debug!(realm = %self.realm(), principal = %stored.principal, issued_at_ms = stored.issued_at_ms, "session cookie issued in the future");
            return self.reject(AppError::missing_token(challenge()));
        }

        if stored.is_expired(self.config.max_age_seconds, now_ms) {
            debug!(realm = %self.realm(), principal = %stored.principal, issued_at_ms = stored.issued_at_ms, "session cookie expired");
            return self.reject(AppError::expired_token(challenge()));
        }

        if !self.authorizer.is_authorized(&stored.principal, &self.route) {
            debug!(realm = %self.realm(), principal = %stored.principal, "principal not authorized");
            return self.reject(AppError::not_authorized(challenge()));
        }

        Ok(Subject::authenticated(stored.principal))
    }

    fn reject(&self, err: AppError) -> AppResult<Subject> {
        if self.route.optional { Ok(Subject::anonymous()) } else { Err(err) }
    }

    /// Response phase. `subject` is whatever the request phase attached,
    /// already removed from the request context.
    pub fn respond(
        &self,
        subject: Option<Subject>,
        request_had_cookie: bool,
        headers: &mut HeaderMap,
        now_ms: i64,
    ) -> AppResult<()> {
        let Some(subject) = subject else { return Ok(()) };
        let name = &self.config.cookie_name;

        if let Some(principal) = subject.principal() {
            let value = token::encode_at(principal, &self.config.key, now_ms);
            headers.append(axum::http::header::SET_COOKIE, cookie::session_cookie(&self.config, &value)?);
            debug!(realm = %self.realm(), principal = %principal, "session cookie re-issued");
        }

        if request_had_cookie && !cookie::response_sets_cookie(headers, name) {
            cookie::prepend_set_cookie(headers, cookie::deletion_cookie(&self.config, now_ms)?);
            debug!(realm = %self.realm(), "stale session cookie deleted");
        }
        Ok(())
    }
}
