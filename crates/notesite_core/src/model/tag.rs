//! Tag records and payloads.

use crate::model::draft::{require_fields, DraftValidationError};
use serde::{Deserialize, Serialize};

/// Numeric tag identifier assigned by the data API.
pub type TagId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub slug: String,
    pub title: String,
}

impl Tag {
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        require_fields(&[("title", &self.title), ("slug", &self.slug)])
    }
}

/// Create payload for a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    pub slug: String,
    pub title: String,
}

impl NewTag {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DraftValidationError> {
        require_fields(&[("title", &self.title), ("slug", &self.slug)])
    }
}

/// Link payload for `POST /notesToTags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteTagLink {
    pub note_id: crate::model::note::NoteId,
    pub tag_id: TagId,
}

/// Finds a tag by slug in an already-fetched tag list.
pub fn find_tag_by_slug<'a>(tags: &'a [Tag], slug: &str) -> Option<&'a Tag> {
    tags.iter().find(|tag| tag.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::{find_tag_by_slug, NoteTagLink, Tag};

    #[test]
    fn link_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&NoteTagLink {
            note_id: 3,
            tag_id: 9,
        })
        .expect("link should serialize");
        assert_eq!(json, r#"{"noteId":3,"tagId":9}"#);
    }

    #[test]
    fn find_tag_by_slug_is_exact_match() {
        let tags = vec![Tag {
            id: 1,
            slug: "rust".to_string(),
            title: "Rust".to_string(),
        }];
        assert_eq!(find_tag_by_slug(&tags, "rust").map(|t| t.id), Some(1));
        assert!(find_tag_by_slug(&tags, "Rust").is_none());
    }
}
