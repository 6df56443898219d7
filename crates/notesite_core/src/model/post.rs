//! Post records. Posts predate notes and carry no tags.

use crate::model::draft::{require_fields, DraftValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            markdown: markdown.into(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), DraftValidationError> {
        require_fields(&[
            ("title", &self.title),
            ("slug", &self.slug),
            ("markdown", &self.markdown),
        ])
    }
}
