//! Hard authentication gate.
//!
//! Short-circuits any request without a resolved
//! [`RequestIdentity`](crate::inbound::http::identity::RequestIdentity)
//! with a `303 See Other` to the login route; the inner service is never
//! invoked. Fail-closed: a missing resolver, missing or expired session,
//! and identity lookup failures all leave the extensions empty and are
//! treated as "not authenticated".

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::inbound::http::identity::RequestIdentity;

/// Default route unauthenticated requests are redirected to.
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Middleware factory gating a scope to authenticated requests.
#[derive(Clone)]
pub struct RequireAuth {
    login_path: String,
}

impl RequireAuth {
    /// Gate with a custom login route.
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }
}

impl Default for RequireAuth {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service,
            login_path: self.login_path.clone(),
        }))
    }
}

/// Service wrapper produced by [`RequireAuth`].
pub struct RequireAuthMiddleware<S> {
    service: S,
    login_path: String,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
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
            let fut = self.service.call(req);
            Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
        } else {
            let (request, _payload) = req.into_parts();
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, self.login_path.clone()))
                .finish()
                .map_into_right_body();
            Box::pin(ready(Ok(ServiceResponse::new(request, response))))
        }
    }
}
