//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{web, App};
use chrono::Utc;

use crate::domain::ports::{NewUser, PasswordHasher, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, User, UserId, Username};
use crate::middleware::IdentityResolver;
use crate::outbound::hashing::BcryptPasswordHasher;
use crate::outbound::persistence::InMemoryUserRepository;

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory backend with a low-cost hasher for fast HTTP tests.
pub struct TestBackend {
    pub repo: Arc<InMemoryUserRepository>,
    pub hasher: Arc<BcryptPasswordHasher>,
    pub state: HttpState,
}

impl TestBackend {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(BcryptPasswordHasher::with_cost(4));
        let state = HttpState::new(
            Arc::clone(&repo) as Arc<dyn UserRepository>,
            Arc::clone(&hasher) as Arc<dyn PasswordHasher>,
        );
        Self {
            repo,
            hasher,
            state,
        }
    }

    /// Create a user directly in the store, bypassing the HTTP surface.
    pub async fn seed_user(&self, username: &str, email: &str, password: &str) -> User {
        let password_hash = self.hasher.hash(password).await.expect("hash password");
        self.repo
            .create(NewUser {
                id: UserId::random(),
                username: Username::new(username).expect("username"),
                email: EmailAddress::new(email).expect("email"),
                password_hash,
                created_at: Utc::now(),
            })
            .await
            .expect("seed user")
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.repo
            .find_by_email(&EmailAddress::new(email).expect("email"))
            .await
            .expect("store read")
    }

    pub async fn user_count(&self) -> usize {
        self.repo.len().await
    }

    pub async fn verify(&self, hash: &PasswordHash, candidate: &str) -> bool {
        self.hasher.verify(hash, candidate).await
    }

    pub async fn remove_user(&self, id: &UserId) {
        self.repo.remove(id).await;
    }
}

/// Build the full auth application: session middleware, identity resolver,
/// and the gated route table, backed by the given test backend.
pub fn auth_app(
    backend: &TestBackend,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(backend.state.clone()))
        .configure(super::configure_routes)
        .wrap(IdentityResolver::new(Arc::clone(&backend.state.users)))
        .wrap(test_session_middleware())
}

/// JSON body for a signup request.
pub fn signup_body(username: &str, email: &str, password: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": email,
        "password": password,
    })
}
