use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tracing::{error, Instrument};
use uuid::Uuid;

use crate::identity::RequestContext;
use crate::token::now_millis;

use super::{cookie, SessionFilter};

/// Axum middleware running both phases of `filter` around the handler.
pub async fn cookie_auth(State(filter): State<Arc<SessionFilter>>, mut request: Request, next: Next) -> Response {
    let ctx = match request.extensions().get::<RequestContext>() {
        Some(ctx) => ctx.clone(),
        None => {
            let ctx = RequestContext::with_request_id(Uuid::new_v4().to_string());
            request.extensions_mut().insert(ctx.clone());
            ctx
        }
    };
    let span = tracing::debug_span!(
        "cookie_auth",
        realm = %filter.realm(),
        request_id = %ctx.request_id.as_deref().unwrap_or("-"),
    );

    async move {
        let raw = cookie::parse_cookie(request.headers(), &filter.config().cookie_name);
        let base = cookie::base_uri(request.headers(), request.uri());

        let subject = match filter.authenticate(raw.as_deref(), &base, now_millis()) {
            Ok(subject) => subject,
            Err(e) => return e.into_response(),
        };
        ctx.attach(filter.realm(), subject);

        let mut response = next.run(request).await;

        let subject = ctx.take(filter.realm());
        if let Err(e) = filter.respond(subject, raw.is_some(), response.headers_mut(), now_millis()) {
            error!("session response phase failed: {}", e);
            return e.into_response();
        }
        response
    }
    .instrument(span)
    .await
}

/// Guard every route already added to `router` with `filter`.
///
/// Applied as a route layer, so call it after the routes it should cover.
pub fn protect<S>(router: Router<S>, filter: SessionFilter) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(Arc::new(filter), cookie_auth))
}
