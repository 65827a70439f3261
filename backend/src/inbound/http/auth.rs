//! Authentication HTTP handlers.
//!
//! ```text
//! POST /login  {"email":"alice@x.com","password":"secret1"}
//! POST /signup {"username":"alice","email":"alice@x.com","password":"secret1"}
//! POST /logout
//! GET  /me
//! ```
//!
//! Handlers translate JSON payloads into validated domain inputs, delegate
//! to [`AuthService`], and own the session side-effects the service keeps
//! out of validation.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    AuthValidationError, Error, FieldErrors, LoginCredentials, LoginOutcome, SignupDetails,
    SignupOutcome, User,
};

use super::identity::RequestIdentity;
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signup request body for `POST /signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Public view of a user; the password hash never leaves the domain.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
        }
    }
}

fn field_error_details(errors: &FieldErrors) -> serde_json::Value {
    json!({ "fieldErrors": errors })
}

fn missing_field_name(err: &AuthValidationError) -> &'static str {
    match err {
        AuthValidationError::EmptyUsername => "username",
        AuthValidationError::EmptyEmail => "email",
        AuthValidationError::EmptyPassword => "password",
    }
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing credentials", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from_parts(&payload.email, &payload.password).map_err(|err| {
            Error::invalid_request("Email and password are required")
                .with_details(json!({ "field": missing_field_name(&err) }))
        })?;

    match state.auth.login(&credentials).await? {
        LoginOutcome::Authenticated(user) => {
            session.persist_user(user.id())?;
            Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
        }
        LoginOutcome::Rejected(errors) => Err(Error::unauthorized("Login failed")
            .with_details(field_error_details(&errors))),
    }
}

/// Create an account and log the new user in.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Validation failed", body = Error),
        (status = 409, description = "Uniqueness race detected", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let details =
        SignupDetails::try_from_parts(&payload.username, &payload.email, &payload.password)
            .map_err(|err| {
                Error::invalid_request("All fields are required")
                    .with_details(json!({ "field": missing_field_name(&err) }))
            })?;

    match state.auth.signup(&details).await? {
        SignupOutcome::Created(user) => {
            // The account exists regardless of the session outcome; a
            // failed session write means the user logs in manually.
            if let Err(err) = session.persist_user(user.id()) {
                tracing::error!(
                    error = %err,
                    user_id = %user.id(),
                    "session write failed after signup"
                );
            }
            Ok(HttpResponse::Created().json(UserResponse::from(&user)))
        }
        SignupOutcome::Rejected(errors) => Err(Error::invalid_request("Signup failed")
            .with_details(field_error_details(&errors))),
    }
}

/// Destroy the current session.
///
/// Best-effort from the caller's perspective: the session is purged and
/// the response is always `204`, store trouble is logged only.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 204, description = "Session destroyed"),
        (status = 303, description = "Not authenticated; redirected to login")
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("")]
pub async fn logout(identity: RequestIdentity, session: SessionContext) -> HttpResponse {
    tracing::info!(user_id = %identity.user_id(), "logging out user");
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 303, description = "Not authenticated; redirected to login")
    ),
    tags = ["auth"],
    operation_id = "current_user"
)]
#[get("")]
pub async fn current_user(identity: RequestIdentity) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(identity.user()))
}
