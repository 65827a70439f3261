//! Request-scoped identity derived from the session.
//!
//! The soft-resolution middleware resolves the session's user id against
//! the credential store once per request and stores the result here, in
//! the request's extensions. Extractors read it from there; nothing is
//! cached across requests, so a deleted account stops resolving on the
//! very next request.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::domain::{Error, User, UserId};

/// Identity resolved for the current request.
///
/// Present in request extensions only when the session named a user id and
/// that id still resolved to a live [`User`].
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    user: User,
}

impl RequestIdentity {
    /// Wrap a freshly resolved user.
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// The resolved user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Identifier of the resolved user.
    pub fn user_id(&self) -> &UserId {
        self.user.id()
    }
}

impl FromRequest for RequestIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Self>()
                .cloned()
                .ok_or_else(|| Error::unauthorized("login required")),
        )
    }
}

/// Optional variant of [`RequestIdentity`] for handlers that serve both
/// anonymous and authenticated callers.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<RequestIdentity>);

impl MaybeIdentity {
    /// The resolved identity, if the request is authenticated.
    pub fn identity(&self) -> Option<&RequestIdentity> {
        self.0.as_ref()
    }
}

impl FromRequest for MaybeIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(req.extensions().get::<RequestIdentity>().cloned())))
    }
}
