use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a long free-text field (at most 1MB, optionally non-empty).
pub fn validate_text(value: &str, field: &str, required: bool) -> Result<(), AppError> {
    if required && value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > 1_000_000 {
        return Err(AppError::Validation(format!("{field} must be at most 1MB")));
    }
    Ok(())
}

/// Normalize an optional external link: blank means absent, otherwise it
/// must be an http(s) URL of at most 2048 bytes.
pub fn normalize_link(link: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    let Some(link) = link else {
        return Ok(None);
    };
    let link = link.trim();
    if link.is_empty() {
        return Ok(None);
    }
    if !(link.starts_with("http://") || link.starts_with("https://")) {
        return Err(AppError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    if link.len() > 2048 || link.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(format!(
            "{field} must be a URL of at most 2048 characters"
        )));
    }
    Ok(Some(link.to_string()))
}
