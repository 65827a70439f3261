//! Request middleware.
//!
//! Purpose: request-lifecycle concerns that sit in front of the handlers —
//! trace correlation, soft identity resolution, and the two route gates.
//!
//! Ordering matters: [`IdentityResolver`] must wrap inside the session
//! middleware (it reads the session) and outside both gates (they consume
//! the identity it resolves).

pub mod identity;
pub mod redirect_authenticated;
pub mod require_auth;
pub mod trace;

pub use identity::IdentityResolver;
pub use redirect_authenticated::RedirectAuthenticated;
pub use require_auth::RequireAuth;
pub use trace::Trace;
