use super::*;

#[test]
fn http_status_mapping() {
    assert_eq!(AppError::missing_token(challenge_for("app", "/")).http_status(), 401);
    assert_eq!(AppError::expired_token(challenge_for("app", "/")).http_status(), 401);
    assert_eq!(AppError::not_authorized(challenge_for("app", "/")).http_status(), 401);
    assert_eq!(AppError::not_found("not_found", "missing").http_status(), 404);
    assert_eq!(AppError::realm_not_found("app").http_status(), 500);
    assert_eq!(AppError::internal("internal", "panic").http_status(), 500);
}

#[test]
fn realm_not_found_message() {
    let e = AppError::realm_not_found("billing");
    assert_eq!(e.code_str(), "realm_not_found");
    assert_eq!(e.message(), "Realm Config 'billing' not found");
    assert!(e.challenge().is_none());
    assert!(!e.is_unauthorized());
}

#[test]
fn challenge_names_realm_and_base_uri() {
    let ch = challenge_for("app", "http://localhost:7878/");
    assert_eq!(ch, "GBASICAUTH realm=\"app\", uri=\"http://localhost:7878/\"");
    let e = AppError::expired_token(ch.clone());
    assert_eq!(e.challenge(), Some(ch.as_str()));
    assert_eq!(e.to_string(), "expired_token: Expired authentication token");
}

#[test]
fn unauthorized_response_carries_www_authenticate() {
    let resp = AppError::not_authorized(challenge_for("app", "/")).into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let h = resp.headers().get(header::WWW_AUTHENTICATE).unwrap().to_str().unwrap();
    assert!(h.contains("realm=\"app\""));

    let resp = AppError::realm_not_found("x").into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_none());
}

#[test]
fn token_errors_map_to_internal() {
    let e: AppError = TokenError::Length(3).into();
    assert_eq!(e.code_str(), "token_error");
    assert_eq!(e.http_status(), 500);
}
