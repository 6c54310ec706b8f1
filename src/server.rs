//!
//! cookie-realm demo HTTP server
//! -----------------------------
//! Axum server wiring one realm (`app`) with both a mandatory and an optional
//! session filter.
//!
//! Responsibilities:
//! - `/login` mints a principal and establishes a session cookie.
//! - `/logout` drops the session; the stale cookie is deleted on the way out.
//! - `/me` requires a valid session; `/public` accepts anonymous callers.
//! - Every authenticated response slides the cookie expiry forward.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::config::{ServerConfig, DEMO_REALM};
use crate::error::{AppError, AppResult};
use crate::filter::{protect, SessionFilter};
use crate::identity::{AllowAll, Authorizer, Principal, RequestContext, RouteAuth};
use crate::realm::RealmRegistry;

/// Build the demo router. Fails when `app` is not registered.
pub fn app(registry: &RealmRegistry, authorizer: Arc<dyn Authorizer>) -> AppResult<Router> {
    let required = RouteAuth::required(DEMO_REALM);
    let optional = RouteAuth::optional(DEMO_REALM);
    registry.validate_routes(&[required.clone(), optional.clone()])?;

    let private = Router::new().route("/me", get(me));
    let private = protect(private, SessionFilter::new(registry, required, authorizer.clone())?);

    let public = Router::new()
        .route("/public", get(public))
        .route("/login", post(login))
        .route("/logout", post(logout));
    let public = protect(public, SessionFilter::new(registry, optional, authorizer)?);

    Ok(Router::new()
        .route("/", get(|| async { "cookie-realm ok" }))
        .merge(private)
        .merge(public))
}

async fn me(ctx: RequestContext) -> Json<serde_json::Value> {
    let principal = ctx.principal(DEMO_REALM).map(|p| p.id().to_string());
    Json(json!({"status": "ok", "principal": principal}))
}

async fn public(ctx: RequestContext) -> Json<serde_json::Value> {
    match ctx.principal(DEMO_REALM) {
        Some(p) => Json(json!({"status": "ok", "principal": p.id()})),
        None => Json(json!({"status": "ok", "principal": "anonymous"})),
    }
}

async fn login(ctx: RequestContext) -> AppResult<Json<serde_json::Value>> {
    let principal = Principal::generate(&mut rand_core::OsRng)?;
    let id = principal.id().to_string();
    if !ctx.login(DEMO_REALM, principal) {
        return Err(AppError::internal("session_unavailable", "login route is not behind the session filter"));
    }
    info!(target: "session", "login principal={}", id);
    Ok(Json(json!({"status": "ok", "principal": id})))
}

async fn logout(ctx: RequestContext) -> Json<serde_json::Value> {
    if let Some(p) = ctx.principal(DEMO_REALM) {
        info!(target: "session", "logout principal={}", p);
    }
    ctx.logout(DEMO_REALM);
    Json(json!({"status": "ok"}))
}

pub async fn run_with_port(http_port: u16, registry: RealmRegistry, authorizer: Arc<dyn Authorizer>) -> anyhow::Result<()> {
    let router = app(&registry, authorizer).context("While wiring session filters")?;
    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Entry point used by the binary: realms from config, every valid session authorized.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let registry = config.build_registry(&mut rand_core::OsRng)?;
    info!(target: "startup", "realms registered: {:?}", registry.names());
    run_with_port(config.http_port, registry, Arc::new(AllowAll)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_without_session_filter_fails() {
        let err = login(RequestContext::default()).await.unwrap_err();
        assert_eq!(err.code_str(), "session_unavailable");
        assert_eq!(err.http_status(), 500);
    }
}
