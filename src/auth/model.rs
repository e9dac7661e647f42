use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Identity claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

/// Caller identity after token validation and role resolution.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    #[schema(example = "pricing@tradingsol.com")]
    pub email: String,
    #[schema(example = "Pedro Luis Bruges")]
    pub name: String,
    pub role: Role,
}
