//! Session manager wrapping the Actix cookie session.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal
//! with domain-friendly operations. The session's `user_id` slot is owned
//! exclusively by this type: no other component reads or writes it
//! directly.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper exposing the session operations the handlers need.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session.
    ///
    /// Idempotent per request: a second call overwrites the slot rather
    /// than duplicating it.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Destroy the session: state is dropped and the cookie is marked
    /// expired, not merely cleared client-side.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// Pure read. Store errors and malformed values are logged and read as
    /// absent; the fail-closed guarantee for protected routes lives in the
    /// gate middleware, which only trusts a fully resolved identity.
    pub fn user_id(&self) -> Option<UserId> {
        let raw = match self.0.get::<String>(USER_ID_KEY) {
            Ok(value) => value?,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session; treating as anonymous");
                return None;
            }
        };
        match UserId::parse(&raw) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(error = %err, "invalid user id in session cookie");
                None
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    async fn get_with_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        uri: &str,
        cookie: actix_web::cookie::Cookie<'static>,
    ) -> actix_web::dev::ServiceResponse {
        test::call_service(
            app,
            test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id = UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                            .expect("fixture id");
                        session.persist_user(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        match session.user_id() {
                            Some(id) => HttpResponse::Ok().body(id.to_string()),
                            None => HttpResponse::NoContent().finish(),
                        }
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = get_with_cookie(&app, "/get", cookie).await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[actix_web::test]
    async fn clear_leaves_no_user_id_behind() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&UserId::random())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/clear",
                    web::get().to(|session: SessionContext| async move {
                        session.clear();
                        HttpResponse::Ok().finish()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        match session.user_id() {
                            Some(id) => HttpResponse::Ok().body(id.to_string()),
                            None => HttpResponse::NoContent().finish(),
                        }
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set_res);

        let clear_res = get_with_cookie(&app, "/clear", cookie).await;
        // Purge instructs the client to drop the cookie via an expired
        // replacement; a later read with the stale cookie still finds no
        // user id because the state was removed.
        let cleared_cookie = session_cookie(&clear_res);
        let get_res = get_with_cookie(&app, "/get", cleared_cookie).await;
        assert_eq!(get_res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn tampered_user_id_reads_as_absent() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        match session.user_id() {
                            Some(id) => HttpResponse::Ok().body(id.to_string()),
                            None => HttpResponse::NoContent().finish(),
                        }
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let get_res = get_with_cookie(&app, "/get", cookie).await;
        assert_eq!(get_res.status(), StatusCode::NO_CONTENT);
    }
}
