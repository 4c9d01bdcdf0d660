//! Route table
//!
//! | method | path | auth |
//! |--------|------|------|
//! | GET | `/health` | public |
//! | POST | `/auth/signup`, `/auth/login`, `/auth/request-2fa`, `/auth/verify-2fa` | public |
//! | GET | `/users/me` | bearer |
//! | POST | `/users/enable-2fa`, `/users/disable-2fa` | bearer |
//! | POST | `/users/search` | bearer, `super_admin` |
//! | POST | `/<entity>/search` | bearer |
//! | GET | `/<entity>/{id}` | bearer |
//!
//! Everything is mounted under the configured global prefix.

use actix_web::web;
use serde_json::json;

use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::services::search::public_entities;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig, global_prefix: &str) {
    cfg.service(
        web::scope(global_prefix)
            .service(health_check)
            .configure(configure_auth_routes)
            .configure(configure_user_routes)
            .configure(configure_entity_routes),
    );
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::signup)
            .service(handlers::auth::login)
            .service(handlers::auth::request_2fa)
            .service(handlers::auth::verify_2fa),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::me)
            .service(handlers::users::enable_2fa)
            .service(handlers::users::disable_2fa)
            .service(handlers::users::search_users),
    );
}

fn configure_entity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(&entity_scope_path())
            .wrap(AuthMiddleware::required())
            .service(handlers::search::search_entity)
            .service(handlers::search::find_entity),
    );
}

/// `/{entity:categories|competencies|...}`, so unknown segments fall through to a 404.
pub fn entity_scope_path() -> String {
    let slugs: Vec<&str> = public_entities().map(|entity| entity.slug).collect();
    format!("/{{entity:{}}}", slugs.join("|"))
}

#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "nextone_lms_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
