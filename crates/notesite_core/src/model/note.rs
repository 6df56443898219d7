//! Note records and payloads.

use crate::model::draft::{require_fields, DraftValidationError};
use serde::{Deserialize, Serialize};

/// Numeric note identifier assigned by the data API.
pub type NoteId = i64;

/// Full note as returned by single-note lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// URL-safe unique identifier.
    pub slug: String,
    pub title: String,
    /// Raw markdown source. May be empty on legacy rows.
    #[serde(default)]
    pub markdown: String,
    /// Epoch milliseconds, absent on rows created before timestamps existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Note {
    /// Validates the editable fields before an update is submitted.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        require_fields(&[
            ("title", &self.title),
            ("slug", &self.slug),
            ("markdown", &self.markdown),
        ])
    }
}

/// Create payload for a note. The data API assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub slug: String,
    pub title: String,
    pub markdown: String,
}

impl NewNote {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            markdown: markdown.into(),
        }
    }

    /// Validates that title, slug and markdown are all present.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        require_fields(&[
            ("title", &self.title),
            ("slug", &self.slug),
            ("markdown", &self.markdown),
        ])
    }

    /// Attaches a data-API id, producing the full record used for updates.
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            slug: self.slug,
            title: self.title,
            markdown: self.markdown,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Listing projection returned by `GET /notes` and tag filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub slug: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::{Note, NewNote};

    #[test]
    fn note_decodes_camel_case_timestamps() {
        let note: Note = serde_json::from_str(
            r#"{"id":7,"slug":"a","title":"A","markdown":"x","createdAt":1,"updatedAt":2}"#,
        )
        .expect("note json should decode");
        assert_eq!(note.created_at, Some(1));
        assert_eq!(note.updated_at, Some(2));
    }

    #[test]
    fn note_without_markdown_decodes_to_empty_body() {
        let note: Note = serde_json::from_str(r#"{"id":1,"slug":"a","title":"A"}"#)
            .expect("note json should decode");
        assert!(note.markdown.is_empty());
        assert!(note.validate().is_err());
    }

    #[test]
    fn new_note_reports_every_missing_field() {
        let err = NewNote::new(" ", "", "body").validate().expect_err("blank fields");
        assert_eq!(err.missing, vec!["title", "slug"]);
    }
}
