//! # Authentication Middleware
//!
//! Requires a valid bearer token on every request of the wrapped scope and inserts the
//! [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser) into the request
//! extensions. With a required role the user is also loaded from the store and checked.
//!
//! | failure | status |
//! |---------|--------|
//! | missing / malformed / expired token | 401 |
//! | user lacks the role or is deactivated | 403 |
//!
//! ```rust,ignore
//! web::scope("/users")
//!     .wrap(AuthMiddleware::required())
//!     .service(handlers::users::me)
//! ```
//!
//! The token service is taken from `web::Data<AppState>`, so the app must register it.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::entities::users::Role;
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    required_role: Option<Role>,
}

impl AuthMiddleware {
    /// Any authenticated user.
    pub fn required() -> Self {
        Self { required_role: None }
    }

    /// Authenticated users holding `role`.
    pub fn required_with_role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            required_role: self.required_role,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::auth::AuthenticatedUser;
    use crate::repositories::users::memory_store::InMemoryUserStore;
    use crate::state::testing::test_state;
    use crate::domain::entities::users::User;
    use actix_web::http::{header, StatusCode};
    use actix_web::{get, test, App, HttpResponse};
    use std::sync::Arc;

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.email)
    }

    fn seed(store: &InMemoryUserStore, email: &str, role: Role) -> User {
        store.seed(User::new_local(
            email.to_string(),
            "Someone".to_string(),
            "hash".to_string(),
            role,
        ))
    }

    #[actix_web::test]
    async fn test_missing_and_invalid_tokens_are_rejected() {
        let store = Arc::new(InMemoryUserStore::new());
        let (state, _sent) = test_state(store).await;
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(actix_web::web::scope("").wrap(AuthMiddleware::required()).service(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer not.a.token"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let store = Arc::new(InMemoryUserStore::new());
        let user = seed(&store, "me@example.com", Role::User);
        let (state, _sent) = test_state(store).await;
        let token = state.tokens.generate_access_token(&user).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(actix_web::web::scope("").wrap(AuthMiddleware::required()).service(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "me@example.com");
    }

    #[actix_web::test]
    async fn test_role_is_checked_against_the_store() {
        let store = Arc::new(InMemoryUserStore::new());
        let admin = seed(&store, "root@example.com", Role::SuperAdmin);
        let member = seed(&store, "member@example.com", Role::OrgAdmin);
        let (state, _sent) = test_state(store).await;
        let admin_token = state.tokens.generate_access_token(&admin).unwrap();
        let member_token = state.tokens.generate_access_token(&member).unwrap();
        let app = test::init_service(
            App::new().app_data(state).service(
                actix_web::web::scope("")
                    .wrap(AuthMiddleware::required_with_role(Role::SuperAdmin))
                    .service(whoami),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", admin_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", member_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }
}
