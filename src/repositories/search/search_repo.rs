//! # Search Repository
//!
//! Runs the pipelines produced by [`AggregationBuilder`] and unpacks the `$facet` result
//! (`{ data: [...], total: [{ count }] }`) into a [`Pagination`].

use futures_util::TryStreamExt;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::db::Database;
use crate::domain::dto::search::{Pagination, SearchOptions};
use crate::errors::{AppError, AppResult};
use crate::query::{AggregationBuilder, EntityPipeline};

/// Aggregation-backed read access to the LMS collections
#[derive(Clone)]
pub struct SearchRepository {
    database: Database,
}

impl SearchRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// One page of `entity` matching `options`.
    ///
    /// # Errors
    ///
    /// * `AppError::DatabaseError` - the aggregation failed
    pub async fn search(
        &self,
        entity: &EntityPipeline,
        options: &SearchOptions,
    ) -> AppResult<Pagination<Document>> {
        let pipeline = AggregationBuilder::new(entity, options).build();
        log::debug!("{} search pipeline: {:?}", entity.slug, pipeline);

        let results = self.run(entity, pipeline).await?;
        let facet = results.into_iter().next();

        Ok(unpack_facet(facet, options.offset, options.page_size()))
    }

    /// A single populated document by id, `None` when absent.
    pub async fn find_by_id(&self, entity: &EntityPipeline, id: ObjectId) -> AppResult<Option<Document>> {
        let results = self.run(entity, AggregationBuilder::by_id(entity, id)).await?;
        Ok(results.into_iter().next())
    }

    async fn run(&self, entity: &EntityPipeline, pipeline: Vec<Document>) -> AppResult<Vec<Document>> {
        let cursor = self
            .database
            .collection::<Document>(entity.collection)
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

/// Splits the `$facet` output into data and total. A missing facet is an empty page.
pub(crate) fn unpack_facet(facet: Option<Document>, offset: u64, size: u64) -> Pagination<Document> {
    let Some(mut facet) = facet else {
        return Pagination::empty(offset, size);
    };

    let data: Vec<Document> = match facet.remove("data") {
        Some(Bson::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Bson::Document(doc) => Some(doc),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    // `$count` emits nothing when no document matched.
    let total = facet
        .get_array("total")
        .ok()
        .and_then(|counts| counts.first())
        .and_then(Bson::as_document)
        .and_then(|count| match count.get("count") {
            Some(Bson::Int32(n)) => u64::try_from(*n).ok(),
            Some(Bson::Int64(n)) => u64::try_from(*n).ok(),
            _ => None,
        })
        .unwrap_or(0);

    Pagination::new(data, total, offset, size)
}
