//! Generic entity endpoints: `POST /<entity>/search` and `GET /<entity>/{id}`.
//!
//! Mounted under a scope whose path captures the entity slug, see
//! [`crate::routes::entity_scope_path`].

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::domain::dto::search::SearchOptions;
use crate::errors::AppError;
use crate::state::AppState;

#[post("/search")]
pub async fn search_entity(
    state: web::Data<AppState>,
    entity: web::Path<String>,
    payload: web::Json<SearchOptions>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let page = state.search.search(&entity, &payload).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{id}")]
pub async fn find_entity(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (entity, id) = path.into_inner();

    let document = state.search.find_by_id(&entity, &id).await?;
    Ok(HttpResponse::Ok().json(document))
}
