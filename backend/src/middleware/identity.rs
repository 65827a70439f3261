//! Soft identity resolution middleware.
//!
//! Reads the session's user id and resolves it against the credential
//! store once per request. On success a
//! [`RequestIdentity`](crate::inbound::http::identity::RequestIdentity) is
//! inserted into the request extensions for extractors and gates to
//! consume; on any failure (no session, unreadable session, unknown or
//! deleted user, store error) the request proceeds anonymously. This
//! middleware never blocks a request.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, warn};

use crate::domain::ports::UserRepository;
use crate::domain::UserId;
use crate::inbound::http::identity::RequestIdentity;
use crate::inbound::http::session::USER_ID_KEY;

/// Middleware factory resolving the session into a [`RequestIdentity`].
///
/// Must be wrapped inside the session middleware (it reads the session)
/// and outside the route gates (they consume what it resolves).
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    /// Build the resolver over the credential store.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityResolver
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityResolverMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityResolverMiddleware {
            service: Rc::new(service),
            users: Arc::clone(&self.users),
        }))
    }
}

/// Service wrapper produced by [`IdentityResolver`].
pub struct IdentityResolverMiddleware<S> {
    service: Rc<S>,
    users: Arc<dyn UserRepository>,
}

impl<S, B> Service<ServiceRequest> for IdentityResolverMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let users = Arc::clone(&self.users);
        Box::pin(async move {
            if let Some(user_id) = session_user_id(&req) {
                match users.find_by_id(&user_id).await {
                    Ok(Some(user)) => {
                        req.extensions_mut().insert(RequestIdentity::new(user));
                    }
                    Ok(None) => {
                        debug!(%user_id, "session user no longer exists; continuing anonymous");
                    }
                    Err(err) => {
                        warn!(error = %err, "identity lookup failed; continuing anonymous");
                    }
                }
            }
            service.call(req).await
        })
    }
}

fn session_user_id(req: &ServiceRequest) -> Option<UserId> {
    let session = req.get_session();
    let raw = match session.get::<String>(USER_ID_KEY) {
        Ok(value) => value?,
        Err(err) => {
            debug!(error = %err, "unreadable session; continuing anonymous");
            return None;
        }
    };
    match UserId::parse(&raw) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(error = %err, "invalid user id in session; continuing anonymous");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::identity::MaybeIdentity;
    use crate::inbound::http::session::SessionContext;
    use crate::inbound::http::test_utils::{test_session_middleware, TestBackend};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    fn resolver_app(
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
            .route(
                "/set/{id}",
                web::get().to(
                    |session: SessionContext, path: web::Path<String>| async move {
                        let id = UserId::parse(path.into_inner()).expect("valid id in test");
                        session.persist_user(&id)?;
                        Ok::<_, crate::domain::Error>(HttpResponse::Ok())
                    },
                ),
            )
            .route(
                "/whoami",
                web::get().to(|identity: MaybeIdentity| async move {
                    match identity.identity() {
                        Some(identity) => {
                            HttpResponse::Ok().body(identity.user().username().to_string())
                        }
                        None => HttpResponse::NoContent().finish(),
                    }
                }),
            )
            .wrap(IdentityResolver::new(Arc::clone(&backend.state.users)))
            .wrap(test_session_middleware())
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn resolves_identity_for_a_live_user() {
        let backend = TestBackend::new();
        let user = backend.seed_user("alice", "alice@x.com", "secret1").await;
        let app = test::init_service(resolver_app(&backend)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/set/{}", user.id()))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "alice");
    }

    #[actix_web::test]
    async fn anonymous_without_a_session() {
        let backend = TestBackend::new();
        let app = test::init_service(resolver_app(&backend)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn deleted_user_resolves_anonymous_without_blocking() {
        let backend = TestBackend::new();
        let user = backend.seed_user("alice", "alice@x.com", "secret1").await;
        let app = test::init_service(resolver_app(&backend)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/set/{}", user.id()))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&res);

        backend.remove_user(user.id()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
