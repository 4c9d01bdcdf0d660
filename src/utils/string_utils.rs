//! # String utilities

use serde::Deserialize;

use crate::errors::AppError;

/// Trims a required field.
///
/// # Errors
///
/// * `AppError::ValidationError` - the value is empty or whitespace only
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(validate_required_string("  Ada  ", "name")?, "Ada");
/// assert!(validate_required_string("   ", "name").is_err());
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field_name)));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional value, turning blank strings into `None`.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Emails are unique case-insensitively and stored lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Escapes regex metacharacters so `value` matches literally inside a `$regex`.
///
/// ```rust,ignore
/// assert_eq!(escape_regex("c++ (intro)"), r"c\+\+ \(intro\)");
/// ```
pub fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '-' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// serde `deserialize_with` for optional strings: `null`, missing, empty and
/// whitespace-only all become `None`; anything else is trimmed.
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Query {
///     #[serde(default, deserialize_with = "deserialize_optional_string")]
///     sort: Option<String>,
/// }
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// Like [`deserialize_optional_string`], but a non-blank value is kept exactly as sent.
pub fn deserialize_search_term<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}
