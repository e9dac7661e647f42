use actix_web::error::InternalError;
use actix_web::{Error, HttpRequest, HttpResponse};

use super::jwt::validate_token;
use super::model::{AuthenticatedUser, Claims};
use super::roles::RoleDirectory;
use crate::ErrorResponse;

pub const NO_ROLE_MESSAGE: &str = "Dear user, it appears that you do not have an assigned role on the platform. \
This might restrict your access to certain features. Please contact the support team \
(pricing@tradingsol.com) to have the appropriate role assigned. Thank you!";

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

pub(crate) fn json_error(response: HttpResponse, message: &str) -> Error {
    InternalError::from_response(message.to_string(), response).into()
}

/// Validate token from HttpRequest and return claims
pub fn validate_request_token(req: &HttpRequest, secret: &str) -> Result<Claims, Error> {
    let token = extract_token(req).ok_or_else(|| {
        json_error(
            HttpResponse::Unauthorized().json(ErrorResponse::unauthorized(
                "Missing authorization token",
            )),
            "Missing authorization token",
        )
    })?;

    validate_token(&token, secret).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        json_error(
            HttpResponse::Unauthorized()
                .json(ErrorResponse::unauthorized("Invalid or expired token")),
            "Invalid or expired token",
        )
    })
}

/// Resolve the caller's role; callers without one are rejected with 403.
pub fn authenticate(
    req: &HttpRequest,
    secret: &str,
    roles: &RoleDirectory,
) -> Result<AuthenticatedUser, Error> {
    let claims = validate_request_token(req, secret)?;

    let role = roles.resolve(&claims.sub).ok_or_else(|| {
        log::info!("No role assigned to {}", claims.sub);
        json_error(
            HttpResponse::Forbidden().json(ErrorResponse::forbidden(NO_ROLE_MESSAGE)),
            NO_ROLE_MESSAGE,
        )
    })?;

    Ok(AuthenticatedUser {
        email: claims.sub,
        name: claims.name,
        role,
    })
}

/// Like [`authenticate`], additionally requiring access to the request form.
pub fn authorize_form_access(
    req: &HttpRequest,
    secret: &str,
    roles: &RoleDirectory,
) -> Result<AuthenticatedUser, Error> {
    let user = authenticate(req, secret, roles)?;
    if !user.role.can_submit_requests() {
        let message = "Your role does not grant access to advance payment requests";
        return Err(json_error(
            HttpResponse::Forbidden().json(ErrorResponse::forbidden(message)),
            message,
        ));
    }
    Ok(user)
}
