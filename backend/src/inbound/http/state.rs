//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend on
//! the domain service and ports rather than concrete adapters, keeping
//! them testable without real I/O.

use std::sync::Arc;

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::AuthService;

/// Dependency bundle for HTTP handlers and the identity middleware.
#[derive(Clone)]
pub struct HttpState {
    /// Login/signup orchestration.
    pub auth: AuthService,
    /// Credential store, also consumed by the soft-resolution middleware.
    pub users: Arc<dyn UserRepository>,
}

impl HttpState {
    /// Compose the state from the two ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&users), hasher),
            users,
        }
    }
}
