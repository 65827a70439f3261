//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::{configure_routes, state::HttpState};
use crate::middleware::IdentityResolver;
use crate::outbound::hashing::BcryptPasswordHasher;
use crate::outbound::persistence::InMemoryUserRepository;
use crate::Trace;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Assemble the application with its middleware stack.
///
/// Registration order matters: `wrap` executes outermost-last-registered,
/// so trace correlation runs first, then the session middleware, then the
/// identity resolver the route gates depend on.
fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let users = http_state.users.clone();

    let app = App::new()
        .app_data(http_state)
        .configure(configure_routes)
        .wrap(IdentityResolver::new(users))
        .wrap(session)
        .wrap(Trace);

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
    );

    app
}

/// Construct an Actix HTTP server using the provided configuration.
///
/// Wires the in-memory credential store and bcrypt hasher into the auth
/// service. The returned [`Server`] must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let users = Arc::new(InMemoryUserRepository::new());
    let hasher = Arc::new(BcryptPasswordHasher::new());
    let http_state = web::Data::new(HttpState::new(users, hasher));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
