//! # Search Service
//!
//! Resolves a route segment to an [`EntityPipeline`], runs it through the
//! [`SearchRepository`] and converts the BSON results to JSON.
//!
//! `users` is not reachable through the generic entity routes. It is searched through
//! [`SearchService::search_users`], which the handler guards with a `super_admin` check.

use mongodb::bson::oid::ObjectId;
use serde_json::Value;

use crate::domain::dto::search::{Pagination, SearchOptions};
use crate::errors::{AppError, AppResult};
use crate::query::{EntityPipeline, ALL_ENTITIES, USER};
use crate::repositories::search::SearchRepository;
use crate::utils::bson_utils::document_to_json;

/// Search service
pub struct SearchService {
    repository: SearchRepository,
}

impl SearchService {
    pub fn new(repository: SearchRepository) -> Self {
        Self { repository }
    }

    /// One page of the entity behind `slug`.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - unknown entity
    /// * `AppError::DatabaseError` - the aggregation failed
    pub async fn search(&self, slug: &str, options: &SearchOptions) -> AppResult<Pagination<Value>> {
        let entity = resolve_entity(slug)?;
        self.run_search(entity, options).await
    }

    /// One page of users. Secret fields are projected out by the pipeline.
    pub async fn search_users(&self, options: &SearchOptions) -> AppResult<Pagination<Value>> {
        self.run_search(&USER, options).await
    }

    /// A single populated document.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - unknown entity or no document with this id
    /// * `AppError::ValidationError` - `id` is not an ObjectId
    pub async fn find_by_id(&self, slug: &str, id: &str) -> AppResult<Value> {
        let entity = resolve_entity(slug)?;
        let object_id = parse_entity_id(id)?;

        self.repository
            .find_by_id(entity, object_id)
            .await?
            .map(document_to_json)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", entity.slug, id)))
    }

    async fn run_search(
        &self,
        entity: &EntityPipeline,
        options: &SearchOptions,
    ) -> AppResult<Pagination<Value>> {
        let start_time = std::time::Instant::now();
        let page = self.repository.search(entity, options).await?;

        log::debug!(
            "{} search returned {}/{} in {:?}",
            entity.slug,
            page.data.len(),
            page.total,
            start_time.elapsed()
        );

        Ok(page.map(document_to_json))
    }
}

/// Entities reachable through the generic routes, in declaration order.
pub fn public_entities() -> impl Iterator<Item = &'static EntityPipeline> {
    ALL_ENTITIES
        .iter()
        .copied()
        .filter(|entity| entity.slug != USER.slug)
}

/// Entity behind a public route segment.
pub(crate) fn resolve_entity(slug: &str) -> AppResult<&'static EntityPipeline> {
    public_entities()
        .find(|entity| entity.slug == slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown entity: {}", slug)))
}

pub(crate) fn parse_entity_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::ValidationError("Invalid id format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("skills").unwrap().collection, "skills");
        assert_eq!(resolve_entity("job-profiles").unwrap().collection, "jobprofiles");
        assert_eq!(resolve_entity("students").unwrap().collection, "students");
    }

    #[test]
    fn test_users_and_unknown_slugs_are_not_public() {
        assert!(matches!(resolve_entity("users"), Err(AppError::NotFound(_))));
        assert!(matches!(resolve_entity("payments"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_parse_entity_id() {
        assert!(parse_entity_id("507f1f77bcf86cd799439011").is_ok());
        assert!(matches!(
            parse_entity_id("507f1f77"),
            Err(AppError::ValidationError(_))
        ));
    }
}
