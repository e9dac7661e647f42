use actix_web::{web, HttpRequest, HttpResponse};

use super::middleware::authenticate;
use super::model::AuthenticatedUser;
use crate::AppState;

/// Current identity and resolved role
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Authenticated user", body = AuthenticatedUser),
        (status = 401, description = "Missing or invalid token", body = crate::ErrorResponse),
        (status = 403, description = "No role assigned", body = crate::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let user = authenticate(&req, &state.config.jwt_secret, &state.roles)?;
    Ok(HttpResponse::Ok().json(user))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/me").route(web::get().to(get_me)));
}
