//! Service-level error shared by page loaders and actions.

use crate::api::client::ApiError;
use crate::model::draft::DraftValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request-level failure of a loader or action.
#[derive(Debug)]
pub enum ServiceError {
    /// No note exists for the requested slug.
    NoteNotFound(String),
    /// No tag exists for the requested slug.
    TagNotFound(String),
    /// No post exists for the requested slug.
    PostNotFound(String),
    /// The entity exists but has an empty markdown body.
    MissingMarkdown(String),
    /// Submitted draft is missing required fields.
    InvalidSubmission(DraftValidationError),
    /// Data API call failed.
    Api(ApiError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(slug) => write!(f, "note not found: {slug}"),
            Self::TagNotFound(slug) => write!(f, "tag not found: {slug}"),
            Self::PostNotFound(slug) => write!(f, "post not found: {slug}"),
            Self::MissingMarkdown(slug) => write!(f, "markdown body missing for `{slug}`"),
            Self::InvalidSubmission(err) => write!(f, "{err}"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSubmission(err) => Some(err),
            Self::Api(err) => Some(err),
            Self::NoteNotFound(_)
            | Self::TagNotFound(_)
            | Self::PostNotFound(_)
            | Self::MissingMarkdown(_) => None,
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<DraftValidationError> for ServiceError {
    fn from(value: DraftValidationError) -> Self {
        Self::InvalidSubmission(value)
    }
}

/// Rejects entities whose markdown body is blank.
pub(crate) fn require_markdown(slug: &str, markdown: &str) -> ServiceResult<()> {
    if markdown.trim().is_empty() {
        return Err(ServiceError::MissingMarkdown(slug.to_string()));
    }
    Ok(())
}
