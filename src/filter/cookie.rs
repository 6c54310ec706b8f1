//! Cookie header parsing and `Set-Cookie` rendering for realm cookies.

use axum::http::{header, HeaderMap, HeaderValue, Uri};
use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::realm::RealmConfig;

/// Deletion cookies carry an `Expires` this far in the past.
pub const EXPIRED_OFFSET_MS: i64 = 7 * 24 * 60 * 60 * 1000;

pub const DELETED_VALUE: &str = "delete";

/// First value of cookie `name` across all `Cookie` headers.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(s) = value.to_str() else { continue };
        for part in s.split(';') {
            let p = part.trim();
            if let Some((k, v)) = p.split_once('=') {
                if k.trim() == name {
                    return Some(v.trim().trim_matches('"').to_string());
                }
            }
        }
    }
    None
}

/// True when the response already carries a `Set-Cookie` for `name`.
pub fn response_sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers.get_all(header::SET_COOKIE).iter().any(|v| {
        v.to_str()
            .ok()
            .and_then(|s| s.split_once('='))
            .map(|(k, _)| k.trim() == name)
            .unwrap_or(false)
    })
}

pub fn http_date(ms: i64) -> String {
    let at = DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default();
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn scope_attrs(config: &RealmConfig, out: &mut String) {
    if let Some(path) = &config.cookie_path { out.push_str("; Path="); out.push_str(path); }
    if let Some(domain) = &config.cookie_domain { out.push_str("; Domain="); out.push_str(domain); }
}

fn to_header(s: String, config: &RealmConfig) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&s).map_err(|e| {
        AppError::config("bad_cookie".to_string(), format!("realm '{}' produced an invalid Set-Cookie: {}", config.realm_name, e))
    })
}

/// HttpOnly session cookie, not marked Secure.
pub fn session_cookie(config: &RealmConfig, value: &str) -> AppResult<HeaderValue> {
    let mut s = format!("{}={}; Max-Age={}", config.cookie_name, value, config.max_age_seconds);
    scope_attrs(config, &mut s);
    s.push_str("; HttpOnly");
    to_header(s, config)
}

pub fn deletion_cookie(config: &RealmConfig, now_ms: i64) -> AppResult<HeaderValue> {
    let mut s = format!(
        "{}={}; Max-Age=0; Expires={}",
        config.cookie_name,
        DELETED_VALUE,
        http_date(now_ms.saturating_sub(EXPIRED_OFFSET_MS))
    );
    scope_attrs(config, &mut s);
    s.push_str("; HttpOnly");
    to_header(s, config)
}

/// Insert `value` ahead of any existing `Set-Cookie` headers.
pub fn prepend_set_cookie(headers: &mut HeaderMap, value: HeaderValue) {
    let existing: Vec<HeaderValue> = headers.get_all(header::SET_COOKIE).iter().cloned().collect();
    headers.remove(header::SET_COOKIE);
    headers.append(header::SET_COOKIE, value);
    for v in existing {
        headers.append(header::SET_COOKIE, v);
    }
}

/// Scheme and authority the client used, ending in `/`.
pub fn base_uri(headers: &HeaderMap, uri: &Uri) -> String {
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{}://{}/", scheme, authority);
    }
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => {
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("http");
            format!("{}://{}/", scheme, host)
        }
        None => "/".to_string(),
    }
}
