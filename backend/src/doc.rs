//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers the auth endpoint paths, the request/response schemas they
//! reference, and the session cookie security scheme.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginRequest, SignupRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login and POST /signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Gatehouse API",
        description = "Credential validation, session issuance, and session-scoped identity."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
    ),
    components(schemas(LoginRequest, SignupRequest, UserResponse, Error, ErrorCode)),
    tags(
        (name = "auth", description = "Authentication and session lifecycle")
    )
)]
pub struct ApiDoc;
