//! Ordered stage builders
//!
//! [`STAGE_ORDER`] is the single source of truth for where each stage lands in the pipeline.
//! A builder returns an empty list when its option is absent, so every stage is skipped
//! independently and the relative order of the remaining ones never changes.

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::domain::dto::search::{FieldFilter, FilterOperator, SearchOptions};
use crate::utils::string_utils::escape_regex;

use super::entity_pipelines::EntityPipeline;

/// Synthetic field holding `createdAt` as `YYYY-MM-DD` during the date-range stage.
const CREATED_AT_STRING: &str = "createdAtToString";

/// Pipeline stage kinds, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Populate,
    Sort,
    Filter,
    Search,
    Project,
    DateRange,
    Paginate,
}

type StageFn = fn(&EntityPipeline, &SearchOptions) -> Vec<Document>;

/// Fixed stage order. Pagination must stay last.
pub const STAGE_ORDER: [(StageKind, StageFn); 7] = [
    (StageKind::Populate, populate_stage),
    (StageKind::Sort, sort_stage),
    (StageKind::Filter, filter_stage),
    (StageKind::Search, search_stage),
    (StageKind::Project, project_stage),
    (StageKind::DateRange, date_range_stage),
    (StageKind::Paginate, paginate_stage),
];

/// Builds the aggregation pipeline of one search request.
///
/// # Examples
///
/// ```rust,ignore
/// let options = SearchOptions { search_term: Some("rust".into()), ..Default::default() };
/// let pipeline = AggregationBuilder::new(&COURSE, &options).build();
/// let cursor = db.collection::<Document>(COURSE.collection).aggregate(pipeline).await?;
/// ```
pub struct AggregationBuilder<'a> {
    entity: &'a EntityPipeline,
    options: &'a SearchOptions,
}

impl<'a> AggregationBuilder<'a> {
    pub fn new(entity: &'a EntityPipeline, options: &'a SearchOptions) -> Self {
        Self { entity, options }
    }

    /// Emitted stages grouped by kind; skipped kinds are absent.
    pub fn build_stages(&self) -> Vec<(StageKind, Vec<Document>)> {
        STAGE_ORDER
            .iter()
            .filter_map(|(kind, stage)| {
                let documents = stage(self.entity, self.options);
                if documents.is_empty() {
                    None
                } else {
                    Some((*kind, documents))
                }
            })
            .collect()
    }

    /// Flat pipeline ready for `Collection::aggregate`.
    pub fn build(&self) -> Vec<Document> {
        self.build_stages()
            .into_iter()
            .flat_map(|(_, documents)| documents)
            .collect()
    }

    /// Single-document pipeline: match by `_id`, then populate.
    pub fn by_id(entity: &EntityPipeline, id: ObjectId) -> Vec<Document> {
        let mut pipeline = vec![doc! { "$match": { "_id": id } }];
        pipeline.extend(entity.populate_stages());
        pipeline.push(doc! { "$limit": 1 });
        pipeline
    }
}

fn populate_stage(entity: &EntityPipeline, _options: &SearchOptions) -> Vec<Document> {
    entity.populate_stages()
}

fn sort_stage(_entity: &EntityPipeline, options: &SearchOptions) -> Vec<Document> {
    match options.sort_spec() {
        Some((field, dir)) => vec![doc! { "$sort": { field: dir.as_i32() } }],
        None => Vec::new(),
    }
}

fn filter_stage(_entity: &EntityPipeline, options: &SearchOptions) -> Vec<Document> {
    let Some(filters) = options.filters() else {
        return Vec::new();
    };

    let mut conditions = Document::new();
    for filter in filters {
        let condition = filter_condition(filter);
        match conditions.get_document_mut(&filter.field) {
            // Several operators on one field, e.g. a gte/lte range.
            Ok(existing) => existing.extend(condition),
            Err(_) => {
                conditions.insert(filter.field.clone(), condition);
            }
        }
    }

    vec![doc! { "$match": conditions }]
}

fn filter_condition(filter: &FieldFilter) -> Document {
    let value = filter_value(&filter.field, &filter.value);
    let value = match filter.operator {
        FilterOperator::In | FilterOperator::Nin => match value {
            Bson::Array(_) => value,
            single => Bson::Array(vec![single]),
        },
        _ => value,
    };

    let mut condition = Document::new();
    condition.insert(filter.operator.mongo_operator(), value);
    condition
}

/// JSON filter value as BSON. Hex strings on `_id` and `*Id` / `*ID` fields become ObjectIds so
/// references can be filtered with the plain string form.
fn filter_value(field: &str, value: &serde_json::Value) -> Bson {
    let references_id = field == "_id" || field.ends_with("Id") || field.ends_with("ID");

    match value {
        serde_json::Value::String(s) if references_id => ObjectId::parse_str(s)
            .map(Bson::ObjectId)
            .unwrap_or_else(|_| Bson::String(s.clone())),
        serde_json::Value::Array(items) => {
            Bson::Array(items.iter().map(|item| filter_value(field, item)).collect())
        }
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Bson::Int64)
            .or_else(|| n.as_f64().map(Bson::Double))
            .unwrap_or(Bson::Null),
        other => Bson::try_from(other.clone()).unwrap_or(Bson::Null),
    }
}

fn search_stage(entity: &EntityPipeline, options: &SearchOptions) -> Vec<Document> {
    let Some(term) = options.search_term.as_deref() else {
        return Vec::new();
    };
    if entity.search_fields.is_empty() {
        return Vec::new();
    }

    let pattern = escape_regex(term);
    let clauses: Vec<Document> = entity
        .search_fields
        .iter()
        .map(|field| doc! { *field: { "$regex": pattern.as_str(), "$options": "i" } })
        .collect();

    vec![doc! { "$match": { "$or": clauses } }]
}

fn project_stage(_entity: &EntityPipeline, options: &SearchOptions) -> Vec<Document> {
    let Some(attributes) = options.attributes() else {
        return Vec::new();
    };

    let mut projection = Document::new();
    for attribute in attributes {
        projection.insert(attribute, 1);
    }
    // Date-range stage runs after projection and needs createdAt.
    if options.date_range().is_some() && !projection.contains_key("createdAt") {
        projection.insert("createdAt", 1);
    }

    vec![doc! { "$project": projection }]
}

fn date_range_stage(_entity: &EntityPipeline, options: &SearchOptions) -> Vec<Document> {
    let Some((from, to)) = options.date_range() else {
        return Vec::new();
    };

    vec![
        doc! {
            "$addFields": {
                CREATED_AT_STRING: {
                    "$dateToString": { "format": "%Y-%m-%d", "date": "$createdAt" }
                }
            }
        },
        doc! { "$match": { CREATED_AT_STRING: { "$gte": from, "$lte": to } } },
        doc! { "$project": { CREATED_AT_STRING: 0 } },
    ]
}

fn paginate_stage(_entity: &EntityPipeline, options: &SearchOptions) -> Vec<Document> {
    let offset = i64::try_from(options.offset).unwrap_or(i64::MAX);
    let size = options.page_size() as i64;

    vec![doc! {
        "$facet": {
            "data": [ { "$skip": offset }, { "$limit": size } ],
            "total": [ { "$count": "count" } ],
        }
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dto::search::SortDirection;
    use crate::query::entity_pipelines::{CATEGORY, COURSE, ROADMAP};
    use serde_json::json;

    fn kinds(entity: &EntityPipeline, options: &SearchOptions) -> Vec<StageKind> {
        AggregationBuilder::new(entity, options)
            .build_stages()
            .into_iter()
            .map(|(kind, _)| kind)
            .collect()
    }

    fn full_options() -> SearchOptions {
        serde_json::from_value(json!({
            "offset": 20,
            "size": 5,
            "sort": "name",
            "dir": "asc",
            "filterBy": [{ "field": "status", "value": "published" }],
            "searchTerm": "rust",
            "attributesToRetrieve": ["name", "description"],
            "filterByDateFrom": "2024-01-01",
            "filterByDateTo": "2024-12-31"
        }))
        .unwrap()
    }

    #[test]
    fn test_no_options_only_paginates() {
        let options = SearchOptions::default();
        let pipeline = AggregationBuilder::new(&CATEGORY, &options).build();
        assert_eq!(
            pipeline,
            vec![doc! { "$facet": {
                "data": [ { "$skip": 0_i64 }, { "$limit": 10_i64 } ],
                "total": [ { "$count": "count" } ],
            }}]
        );
    }

    #[test]
    fn test_populate_is_always_first_and_paginate_last() {
        let options = SearchOptions::default();
        assert_eq!(
            kinds(&COURSE, &options),
            vec![StageKind::Populate, StageKind::Paginate]
        );
    }

    #[test]
    fn test_all_stages_in_fixed_order() {
        assert_eq!(
            kinds(&ROADMAP, &full_options()),
            vec![
                StageKind::Populate,
                StageKind::Sort,
                StageKind::Filter,
                StageKind::Search,
                StageKind::Project,
                StageKind::DateRange,
                StageKind::Paginate,
            ]
        );
    }

    #[test]
    fn test_stages_skip_independently() {
        let options: SearchOptions = serde_json::from_value(json!({
            "searchTerm": "rust",
            "filterByDateFrom": "2024-01-01",
            "filterByDateTo": "2024-12-31"
        }))
        .unwrap();
        assert_eq!(
            kinds(&CATEGORY, &options),
            vec![StageKind::Search, StageKind::DateRange, StageKind::Paginate]
        );

        let options: SearchOptions = serde_json::from_value(json!({
            "sort": "name",
            "filterBy": [],
            "attributesToRetrieve": [],
            "filterByDateTo": "2024-12-31"
        }))
        .unwrap();
        assert_eq!(kinds(&CATEGORY, &options), vec![StageKind::Paginate]);
    }

    #[test]
    fn test_sort_stage() {
        let mut options = SearchOptions::default();
        options.sort = Some("createdAt".to_string());
        options.dir = Some(SortDirection::Desc);
        assert_eq!(
            sort_stage(&CATEGORY, &options),
            vec![doc! { "$sort": { "createdAt": -1 } }]
        );
    }

    #[test]
    fn test_filters_are_anded_in_one_match() {
        let options: SearchOptions = serde_json::from_value(json!({
            "filterBy": [
                { "field": "status", "value": "published" },
                { "field": "totalPrice", "value": 10, "operator": "gte" },
                { "field": "totalPrice", "value": 50, "operator": "lte" },
                { "field": "level", "value": "beginner", "operator": "in" }
            ]
        }))
        .unwrap();

        assert_eq!(
            filter_stage(&CATEGORY, &options),
            vec![doc! { "$match": {
                "status": { "$eq": "published" },
                "totalPrice": { "$gte": 10_i64, "$lte": 50_i64 },
                "level": { "$in": ["beginner"] },
            }}]
        );
    }

    #[test]
    fn test_id_filters_become_object_ids() {
        let oid = ObjectId::new();
        let options: SearchOptions = serde_json::from_value(json!({
            "filterBy": [
                { "field": "competencyId", "value": oid.to_hex() },
                { "field": "name", "value": oid.to_hex() }
            ]
        }))
        .unwrap();

        assert_eq!(
            filter_stage(&CATEGORY, &options),
            vec![doc! { "$match": {
                "competencyId": { "$eq": oid },
                "name": { "$eq": oid.to_hex() },
            }}]
        );
    }

    #[test]
    fn test_search_matches_every_field_case_insensitively() {
        let mut options = SearchOptions::default();
        options.search_term = Some("rust".to_string());

        assert_eq!(
            search_stage(&COURSE, &options),
            vec![doc! { "$match": { "$or": [
                { "name": { "$regex": "rust", "$options": "i" } },
                { "description": { "$regex": "rust", "$options": "i" } },
                { "category.name": { "$regex": "rust", "$options": "i" } },
                { "skills.name": { "$regex": "rust", "$options": "i" } },
            ]}}]
        );
    }

    #[test]
    fn test_search_term_is_literal() {
        let mut options = SearchOptions::default();
        options.search_term = Some("C++ (advanced)".to_string());

        let stage = search_stage(&CATEGORY, &options);
        let clauses = stage[0]
            .get_document("$match")
            .unwrap()
            .get_array("$or")
            .unwrap();
        let first = clauses[0].as_document().unwrap().get_document("name").unwrap();
        assert_eq!(first.get_str("$regex").unwrap(), r"C\+\+ \(advanced\)");
    }

    #[test]
    fn test_project_stage() {
        let mut options = SearchOptions::default();
        options.attributes_to_retrieve = Some(vec!["name".to_string(), "description".to_string()]);
        assert_eq!(
            project_stage(&CATEGORY, &options),
            vec![doc! { "$project": { "name": 1, "description": 1 } }]
        );
    }

    #[test]
    fn test_project_keeps_created_at_for_date_range() {
        let mut options = SearchOptions::default();
        options.attributes_to_retrieve = Some(vec!["name".to_string()]);
        options.filter_by_date_from = Some("2024-01-01".to_string());
        options.filter_by_date_to = Some("2024-01-31".to_string());
        assert_eq!(
            project_stage(&CATEGORY, &options),
            vec![doc! { "$project": { "name": 1, "createdAt": 1 } }]
        );
    }

    #[test]
    fn test_date_range_is_inclusive_string_comparison() {
        let mut options = SearchOptions::default();
        options.filter_by_date_from = Some("2024-01-01".to_string());
        options.filter_by_date_to = Some("2024-01-31".to_string());

        assert_eq!(
            date_range_stage(&CATEGORY, &options),
            vec![
                doc! { "$addFields": { "createdAtToString": {
                    "$dateToString": { "format": "%Y-%m-%d", "date": "$createdAt" }
                }}},
                doc! { "$match": { "createdAtToString": { "$gte": "2024-01-01", "$lte": "2024-01-31" } } },
                doc! { "$project": { "createdAtToString": 0 } },
            ]
        );
    }

    #[test]
    fn test_paginate_uses_offset_and_clamped_size() {
        let mut options = SearchOptions::default();
        options.offset = 40;
        options.size = 1_000;
        assert_eq!(
            paginate_stage(&CATEGORY, &options),
            vec![doc! { "$facet": {
                "data": [ { "$skip": 40_i64 }, { "$limit": 100_i64 } ],
                "total": [ { "$count": "count" } ],
            }}]
        );
    }

    #[test]
    fn test_by_id_matches_before_populate() {
        let oid = ObjectId::new();
        let pipeline = AggregationBuilder::by_id(&COURSE, oid);
        assert_eq!(pipeline.first(), Some(&doc! { "$match": { "_id": oid } }));
        assert_eq!(pipeline.last(), Some(&doc! { "$limit": 1 }));
        assert_eq!(pipeline.len(), COURSE.populate_stages().len() + 2);
    }
}
