// Field validation for link and collection payloads.
//
// Runs before any remote call; a rejected draft never reaches the store.

use thiserror::Error;
use url::Url;

use crate::types::{CollectionDraft, LinkDraft};

/// Maximum collection name length in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// Maximum collection description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("collection name must not be empty")]
    EmptyName,
    #[error("collection name exceeds {MAX_NAME_CHARS} characters")]
    NameTooLong,
    #[error("collection description exceeds {MAX_DESCRIPTION_CHARS} characters")]
    DescriptionTooLong,
    #[error("link title must not be empty")]
    EmptyTitle,
    #[error("link url is not an absolute http(s) url: {0}")]
    InvalidUrl(String),
}

/// Validate collection fields before an upsert.
pub fn validate_collection(draft: &CollectionDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if draft.name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if let Some(description) = &draft.description {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooLong);
        }
    }
    Ok(())
}

/// Validate link fields before a create.
pub fn validate_link(draft: &LinkDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let parsed = Url::parse(&draft.url)
        .map_err(|error| ValidationError::InvalidUrl(format!("{}: {error}", draft.url)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidUrl(format!(
            "{}: scheme `{}` is not http or https",
            draft.url,
            parsed.scheme()
        )));
    }
    Ok(())
}

/// Split a comma-separated tag string into trimmed, non-empty tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|tag| !tag.is_empty()).map(str::to_owned).collect()
}
