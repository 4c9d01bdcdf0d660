//! `/users` endpoints. Every route requires a bearer token; search also requires
//! `super_admin`.

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::domain::dto::search::SearchOptions;
use crate::domain::entities::users::Role;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::middlewares::AuthMiddleware;
use crate::state::AppState;

#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = state.users.profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[post("/enable-2fa")]
pub async fn enable_2fa(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.two_factor.enable(&user.user_id).await?;
    log::info!("2FA enabled by user {}", user.user_id);
    Ok(HttpResponse::Ok().json(response))
}

#[post("/disable-2fa")]
pub async fn disable_2fa(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.two_factor.disable(&user.user_id).await?;
    log::info!("2FA disabled by user {}", user.user_id);
    Ok(HttpResponse::Ok().json(response))
}

#[post("/search", wrap = "AuthMiddleware::required_with_role(Role::SuperAdmin)")]
pub async fn search_users(
    state: web::Data<AppState>,
    payload: web::Json<SearchOptions>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let page = state.search.search_users(&payload).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::User;
    use crate::middlewares::error_envelope;
    use crate::repositories::users::memory_store::InMemoryUserStore;
    use crate::routes::configure_all_routes;
    use crate::state::testing::test_state;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn seed(store: &InMemoryUserStore, email: &str, role: Role) -> User {
        store.seed(User::new_local(
            email.to_string(),
            "Someone".to_string(),
            "hash".to_string(),
            role,
        ))
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
    async fn test_me_requires_token() {
        let store = Arc::new(InMemoryUserStore::new());
        let (state, _sent) = test_state(store).await;
        let app = init_app!(state);

        let req = test::TestRequest::get().uri("/users/me").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["path"], "/users/me");
    }

    #[actix_web::test]
    async fn test_me_returns_profile() {
        let store = Arc::new(InMemoryUserStore::new());
        let user = seed(&store, "me@example.com", Role::OrgAdmin);
        let (state, _sent) = test_state(store).await;
        let token = state.tokens.generate_access_token(&user).unwrap();
        let app = init_app!(state);

        let req = test::TestRequest::get()
            .uri("/users/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["email"], "me@example.com");
        assert_eq!(body["role"], "org_admin");
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn test_enable_and_disable_two_factor() {
        let store = Arc::new(InMemoryUserStore::new());
        let user = seed(&store, "me@example.com", Role::User);
        let id = user.id.unwrap();
        let (state, _sent) = test_state(store.clone()).await;
        let token = state.tokens.generate_access_token(&user).unwrap();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/users/enable-2fa")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "message": "2FA enabled successfully" }));
        assert!(store.get(&id).unwrap().two_factor_enabled);

        let req = test::TestRequest::post()
            .uri("/users/disable-2fa")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "message": "2FA disabled successfully" }));
        assert!(!store.get(&id).unwrap().two_factor_enabled);
    }

    #[actix_web::test]
    async fn test_user_search_requires_super_admin() {
        let store = Arc::new(InMemoryUserStore::new());
        let user = seed(&store, "member@example.com", Role::User);
        let (state, _sent) = test_state(store).await;
        let token = state.tokens.generate_access_token(&user).unwrap();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/users/search")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .set_json(json!({ "searchTerm": "a" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
