//! Unified application error model.
//! Every failure the session filter can surface to a client, or to the
//! wiring code at startup, is one of these variants.

use std::fmt::{Display, Formatter};

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::token::TokenError;

pub const CHALLENGE_SCHEME: &str = "GBASICAUTH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Client must (re-)authenticate; `challenge` goes out as `WWW-Authenticate`.
    Unauthorized { code: String, message: String, challenge: String },
    NotFound { code: String, message: String },
    /// Deployment defect such as a route wired to an unregistered realm.
    Config { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Unauthorized { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Config { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthorized { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Config { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn challenge(&self) -> Option<&str> {
        match self {
            AppError::Unauthorized { challenge, .. } => Some(challenge.as_str()),
            _ => None,
        }
    }

    pub fn unauthorized<S: Into<String>>(code: S, msg: S, challenge: S) -> Self {
        AppError::Unauthorized { code: code.into(), message: msg.into(), challenge: challenge.into() }
    }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn config<S: Into<String>>(code: S, msg: S) -> Self { AppError::Config { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    pub fn missing_token(challenge: String) -> Self {
        AppError::unauthorized("missing_token".to_string(), "Missing authentication token".to_string(), challenge)
    }
    pub fn expired_token(challenge: String) -> Self {
        AppError::unauthorized("expired_token".to_string(), "Expired authentication token".to_string(), challenge)
    }
    pub fn not_authorized(challenge: String) -> Self {
        AppError::unauthorized("not_authorized".to_string(), "Not authorized".to_string(), challenge)
    }
    pub fn realm_not_found(realm: &str) -> Self {
        AppError::config("realm_not_found".to_string(), format!("Realm Config '{}' not found", realm))
    }

    pub fn is_unauthorized(&self) -> bool { matches!(self, AppError::Unauthorized { .. }) }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Unauthorized { .. } => 401,
            AppError::NotFound { .. } => 404,
            AppError::Config { .. } => 500,
            AppError::Internal { .. } => 500,
        }
    }
}

/// `WWW-Authenticate` value naming the realm and the request's base URI.
pub fn challenge_for(realm: &str, base_uri: &str) -> String {
    format!("{} realm=\"{}\", uri=\"{}\"", CHALLENGE_SCHEME, realm, base_uri)
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal".into(), message: err.to_string() }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Internal { code: "token_error".into(), message: err.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({"status": self.code_str(), "error": self.message()}));
        let mut resp = (status, body).into_response();
        if let Some(ch) = self.challenge() {
            if let Ok(v) = HeaderValue::from_str(ch) {
                resp.headers_mut().insert(header::WWW_AUTHENTICATE, v);
            }
        }
        resp
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
