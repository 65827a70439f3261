//! Inverse gate for the login and signup routes.
//!
//! A request that already carries a resolved
//! [`RequestIdentity`](crate::inbound::http::identity::RequestIdentity) is
//! redirected to the authenticated landing route instead of reaching the
//! login/signup handlers. Because the identity comes from the soft
//! resolver, user existence is re-verified here exactly as it is for the
//! hard gate: a session naming a deleted account falls through to the
//! form.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::inbound::http::identity::RequestIdentity;

/// Default landing route for already-authenticated visitors.
const DEFAULT_LANDING_PATH: &str = "/";

/// Middleware factory keeping authenticated users off the auth forms.
#[derive(Clone)]
pub struct RedirectAuthenticated {
    landing_path: String,
}

impl RedirectAuthenticated {
    /// Gate with a custom landing route.
    pub fn new(landing_path: impl Into<String>) -> Self {
        Self {
            landing_path: landing_path.into(),
        }
    }
}

impl Default for RedirectAuthenticated {
    fn default() -> Self {
        Self::new(DEFAULT_LANDING_PATH)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RedirectAuthenticated
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RedirectAuthenticatedMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectAuthenticatedMiddleware {
            service,
            landing_path: self.landing_path.clone(),
        }))
    }
}

/// Service wrapper produced by [`RedirectAuthenticated`].
pub struct RedirectAuthenticatedMiddleware<S> {
    service: S,
    landing_path: String,
}

impl<S, B> Service<ServiceRequest> for RedirectAuthenticatedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authenticated = req.extensions().get::<RequestIdentity>().is_some();
        if authenticated {
            let (request, _payload) = req.into_parts();
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, self.landing_path.clone()))
                .finish()
                .map_into_right_body();
            Box::pin(ready(Ok(ServiceResponse::new(request, response))))
        } else {
            let fut = self.service.call(req);
            Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
        }
    }
}
