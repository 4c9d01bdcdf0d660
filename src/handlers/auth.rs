//! `/auth` endpoints: signup, password login and the two-factor challenge.
//!
//! Login and a successful `verify-2fa` also set the access token as an HttpOnly `jwt`
//! cookie. Login does not issue a token to accounts with two-factor enabled.

use actix_web::cookie::Cookie;
use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::domain::dto::auth::{LoginRequest, Request2faRequest, SignupRequest, Verify2faRequest};
use crate::errors::AppError;
use crate::state::AppState;

pub const JWT_COOKIE: &str = "jwt";

fn jwt_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(JWT_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state.auth.signup(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state.auth.login(&payload.email, &payload.password).await?;

    let mut builder = HttpResponse::Ok();
    if let Some(token) = response.access_token() {
        builder.cookie(jwt_cookie(token));
    }

    Ok(builder.json(response))
}

#[post("/request-2fa")]
pub async fn request_2fa(
    state: web::Data<AppState>,
    payload: web::Json<Request2faRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state
        .two_factor
        .request_challenge(&payload.email, &payload.password)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("/verify-2fa")]
pub async fn verify_2fa(
    state: web::Data<AppState>,
    payload: web::Json<Verify2faRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state
        .two_factor
        .verify_challenge(&payload.email, &payload.code)
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(jwt_cookie(&response.access_token))
        .json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::{Role, User};
    use crate::middlewares::error_envelope;
    use crate::repositories::users::memory_store::InMemoryUserStore;
    use crate::routes::configure_all_routes;
    use crate::services::auth::password::hash_password;
    use crate::services::mail::TWO_FACTOR_SUBJECT;
    use crate::state::testing::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    const PASSWORD: &str = "Corr3ct!pass";

    fn seed_user(store: &InMemoryUserStore, email: &str, two_factor_enabled: bool) -> User {
        let mut user = User::new_local(
            email.to_string(),
            "Jane Learner".to_string(),
            hash_password(PASSWORD, 4).unwrap(),
            Role::User,
        );
        user.two_factor_enabled = two_factor_enabled;
        store.seed(user)
    }

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state)
                    .wrap(error_envelope())
                    .configure(|cfg| configure_all_routes(cfg, "")),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_signup_creates_user() {
        let store = Arc::new(InMemoryUserStore::new());
        let (state, _sent) = test_state(store).await;
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({
                "email": "new@example.com",
                "name": "New Learner",
                "password": PASSWORD,
                "role": "student"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["email"], "new@example.com");
        assert_eq!(body["role"], "student");
        assert!(body["access_token"].is_string());
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn test_signup_rejects_weak_password() {
        let store = Arc::new(InMemoryUserStore::new());
        let (state, _sent) = test_state(store).await;
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({ "email": "new@example.com", "name": "New", "password": "password" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["path"], "/auth/signup");
    }

    #[actix_web::test]
    async fn test_login_sets_cookie() {
        let store = Arc::new(InMemoryUserStore::new());
        seed_user(&store, "plain@example.com", false);
        let (state, _sent) = test_state(store).await;
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "plain@example.com", "password": PASSWORD }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == JWT_COOKIE)
            .expect("jwt cookie");
        assert_eq!(cookie.http_only(), Some(true));

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["user"]["email"], "plain@example.com");
        assert!(body["access_token"].is_string());
    }

    #[actix_web::test]
    async fn test_login_wrong_password() {
        let store = Arc::new(InMemoryUserStore::new());
        seed_user(&store, "plain@example.com", false);
        let (state, _sent) = test_state(store).await;
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "plain@example.com", "password": "Wr0ng!pass" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[actix_web::test]
    async fn test_two_factor_login_round_trip() {
        let store = Arc::new(InMemoryUserStore::new());
        let user = seed_user(&store, "tfa@example.com", true);
        let (state, mut sent) = test_state(store.clone()).await;
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "tfa@example.com", "password": PASSWORD }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.response().cookies().next().is_none());
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["require2fa"], true);
        assert_eq!(body["userId"], user.id_string().unwrap());
        assert!(body.get("access_token").is_none());

        let req = test::TestRequest::post()
            .uri("/auth/request-2fa")
            .set_json(json!({ "email": "tfa@example.com", "password": PASSWORD }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "message": "2FA code sent to your email", "email": "tfa@example.com" }));

        let mail = tokio::time::timeout(Duration::from_secs(1), sent.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mail.subject, TWO_FACTOR_SUBJECT);
        let code = store
            .get(&user.id.unwrap())
            .and_then(|u| u.pending_challenge())
            .map(|c| c.code)
            .unwrap();
        assert!(mail.html.contains(&code));

        let req = test::TestRequest::post()
            .uri("/auth/verify-2fa")
            .set_json(json!({ "email": "tfa@example.com", "code": code }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().any(|c| c.name() == JWT_COOKIE));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "2FA verified successfully");
        assert_eq!(body["user"]["twoFactorEnabled"], true);
        assert!(body["access_token"].is_string());

        assert!(store.get(&user.id.unwrap()).unwrap().pending_challenge().is_none());
    }

    #[actix_web::test]
    async fn test_verify_without_request() {
        let store = Arc::new(InMemoryUserStore::new());
        seed_user(&store, "tfa@example.com", false);
        let (state, _sent) = test_state(store).await;
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/verify-2fa")
            .set_json(json!({ "email": "tfa@example.com", "code": "123456" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"], "No 2FA code requested");
    }
}
