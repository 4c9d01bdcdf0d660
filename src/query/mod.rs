//! # Aggregation Query Builder
//!
//! Turns a [`SearchOptions`](crate::domain::dto::SearchOptions) into a MongoDB aggregation
//! pipeline for one entity. Every list endpoint goes through the same builder; entities only
//! differ in their [`EntityPipeline`] (collection, populate stages, searchable fields).
//!
//! ## Stage order
//!
//! | # | Stage | Emitted when |
//! |---|-------|--------------|
//! | 1 | Populate | always (may be empty for entities without references) |
//! | 2 | Sort | `sort` and `dir` |
//! | 3 | Filter | `filterBy` non-empty |
//! | 4 | Search | `searchTerm` |
//! | 5 | Project | `attributesToRetrieve` non-empty |
//! | 6 | Date range | `filterByDateFrom` and `filterByDateTo` |
//! | 7 | Paginate | always |
//!
//! ## Modules
//!
//! - [`stages`] - the ordered stage list and [`AggregationBuilder`]
//! - [`populate`] - `$lookup` / `$unwind` / `$group` fragments
//! - [`entity_pipelines`] - the per-entity definitions

pub mod entity_pipelines;
pub mod populate;
pub mod stages;

pub use entity_pipelines::*;
pub use stages::*;
