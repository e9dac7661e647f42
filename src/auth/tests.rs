//! Unit tests for authentication module

use crate::auth::jwt::{issue_identity_token, validate_token};
use crate::auth::middleware::{authenticate, authorize_form_access};
use crate::auth::roles::{Role, RoleDirectory};
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;

const SECRET: &str = "unit-test-secret";

#[test]
fn test_issue_and_validate_identity_token() {
    let token = issue_identity_token("pricing@tradingsol.com", "Pricing Desk", SECRET)
        .expect("Failed to issue token");

    let claims = validate_token(&token, SECRET).expect("Failed to validate token");

    assert_eq!(claims.sub, "pricing@tradingsol.com");
    assert_eq!(claims.name, "Pricing Desk");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let token = issue_identity_token("pricing@tradingsol.com", "Pricing", "other-secret")
        .expect("Failed to issue token");
    assert!(validate_token(&token, SECRET).is_err());
}

#[test]
fn test_invalid_token_returns_error() {
    let result = validate_token("invalid.token.here", SECRET);
    assert!(result.is_err());
}

#[test]
fn test_authenticate_resolves_role() {
    let token = issue_identity_token("sales3@tradingsolutions.com", "Johnny Farah", SECRET).unwrap();
    let req = TestRequest::default()
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_http_request();

    let user = authenticate(&req, SECRET, &RoleDirectory::default()).unwrap();
    assert_eq!(user.role, Role::Commercial);
    assert_eq!(user.name, "Johnny Farah");
}

#[test]
fn test_missing_header_is_unauthorized() {
    let req = TestRequest::default().to_http_request();
    let err = authenticate(&req, SECRET, &RoleDirectory::default()).unwrap_err();
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_unlisted_email_is_forbidden() {
    let token = issue_identity_token("stranger@example.com", "Stranger", SECRET).unwrap();
    let req = TestRequest::default()
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_http_request();

    let err = authenticate(&req, SECRET, &RoleDirectory::default()).unwrap_err();
    assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);
}

#[test]
fn test_inside_role_cannot_use_form() {
    let token =
        issue_identity_token("insidesales@tradingsolutions.com", "Catherine Silva", SECRET).unwrap();
    let req = TestRequest::default()
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_http_request();

    let roles = RoleDirectory::default();
    assert!(authenticate(&req, SECRET, &roles).is_ok());
    let err = authorize_form_access(&req, SECRET, &roles).unwrap_err();
    assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);
}
