//! Search options
//!
//! Body of every `POST /<entity>/search`. All fields are optional; each one drives exactly
//! one stage of the aggregation built by [`crate::query::AggregationBuilder`], and a stage
//! whose option is absent is left out of the pipeline.
//!
//! ```json
//! {
//!   "offset": 0,
//!   "size": 10,
//!   "sort": "createdAt",
//!   "dir": "desc",
//!   "filterBy": [{ "field": "status", "value": "published" }],
//!   "searchTerm": "rust",
//!   "attributesToRetrieve": ["name", "description"],
//!   "filterByDateFrom": "2024-01-01",
//!   "filterByDateTo": "2024-12-31"
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::string_utils::{deserialize_optional_string, deserialize_search_term};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// MongoDB `$sort` value
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// Comparison applied by a [`FieldFilter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    #[default]
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
}

impl FilterOperator {
    pub fn mongo_operator(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Ne => "$ne",
            FilterOperator::Gt => "$gt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Lt => "$lt",
            FilterOperator::Lte => "$lte",
            FilterOperator::In => "$in",
            FilterOperator::Nin => "$nin",
        }
    }
}

/// One field-level condition of `filterBy`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct FieldFilter {
    #[validate(custom(function = "validate_field_path"))]
    pub field: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub operator: FilterOperator,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default)]
    pub offset: u64,

    #[serde(default = "default_page_size")]
    pub size: u64,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(custom(function = "validate_field_path"))]
    pub sort: Option<String>,

    #[serde(default)]
    pub dir: Option<SortDirection>,

    #[serde(default)]
    #[validate(nested)]
    pub filter_by: Option<Vec<FieldFilter>>,

    #[serde(default, deserialize_with = "deserialize_search_term")]
    pub search_term: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_attributes"))]
    pub attributes_to_retrieve: Option<Vec<String>>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(custom(function = "validate_date"))]
    pub filter_by_date_from: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(custom(function = "validate_date"))]
    pub filter_by_date_to: Option<String>,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
            dir: None,
            filter_by: None,
            search_term: None,
            attributes_to_retrieve: None,
            filter_by_date_from: None,
            filter_by_date_to: None,
        }
    }
}

impl SearchOptions {
    /// Requested size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Sort field and direction, only when both were supplied.
    pub fn sort_spec(&self) -> Option<(&str, SortDirection)> {
        match (&self.sort, self.dir) {
            (Some(field), Some(dir)) => Some((field.as_str(), dir)),
            _ => None,
        }
    }

    /// Non-empty filter list.
    pub fn filters(&self) -> Option<&[FieldFilter]> {
        self.filter_by.as_deref().filter(|f| !f.is_empty())
    }

    /// Non-blank attribute names.
    pub fn attributes(&self) -> Option<Vec<&str>> {
        let attributes: Vec<&str> = self
            .attributes_to_retrieve
            .as_ref()?
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect();

        if attributes.is_empty() {
            None
        } else {
            Some(attributes)
        }
    }

    /// Inclusive `YYYY-MM-DD` range, only when both bounds were supplied.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        match (&self.filter_by_date_from, &self.filter_by_date_to) {
            (Some(from), Some(to)) => Some((from.as_str(), to.as_str())),
            _ => None,
        }
    }
}

/// Accepts plain and dotted field names (`status`, `course.name`).
///
/// Names are used as document keys in `$match`, `$sort` and `$project`, so an empty segment
/// or a segment starting with `$` is rejected.
fn validate_field_path(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message("Field name is required".into()));
    }

    let valid = value
        .split('.')
        .all(|segment| !segment.is_empty() && !segment.starts_with('$'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_field")
            .with_message(format!("Invalid field name: {}", value).into()))
    }
}

/// Blank entries are dropped by [`SearchOptions::attributes`]; the rest must be field names.
fn validate_attributes(values: &[String]) -> Result<(), ValidationError> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .try_for_each(validate_field_path)
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("invalid_date").with_message("Date must use the YYYY-MM-DD format".into())
        })
}
