//! HTTP inbound adapter: handlers, session wrapper, identity extractors.

pub mod auth;
pub mod error;
pub mod identity;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

use crate::middleware::{RedirectAuthenticated, RequireAuth};

/// Register the auth routes with their gates.
///
/// `/login` and `/signup` sit behind the redirect-if-authenticated gate;
/// `/logout` and `/me` behind the hard gate. Both gates consume the
/// identity resolved by [`crate::middleware::IdentityResolver`], which the
/// caller must wrap around the application together with the session
/// middleware.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/login")
            .wrap(RedirectAuthenticated::default())
            .service(auth::login),
    )
    .service(
        web::scope("/signup")
            .wrap(RedirectAuthenticated::default())
            .service(auth::signup),
    )
    .service(
        web::scope("/logout")
            .wrap(RequireAuth::default())
            .service(auth::logout),
    )
    .service(
        web::scope("/me")
            .wrap(RequireAuth::default())
            .service(auth::current_user),
    );
}
