//! Submission validation and slug derivation shared by note/tag/post drafts.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid slug regex"));

/// Draft rejected because required fields are blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftValidationError {
    /// Names of blank fields, in declaration order.
    pub missing: Vec<&'static str>,
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "required fields missing: {}", self.missing.join(", "))
    }
}

impl Error for DraftValidationError {}

pub(crate) fn require_fields(fields: &[(&'static str, &str)]) -> Result<(), DraftValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DraftValidationError { missing })
    }
}

/// Derives a URL-safe slug from a title.
///
/// Lowercases, collapses whitespace runs into `-`, then drops every
/// character outside `[a-z0-9_-]`.
pub fn title_to_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let dashed = WHITESPACE_RE.replace_all(&lowered, "-");
    NON_SLUG_RE.replace_all(&dashed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::{require_fields, title_to_slug};

    #[test]
    fn title_to_slug_dashes_whitespace_and_strips_punctuation() {
        assert_eq!(title_to_slug("Hello,  World!"), "hello-world");
        assert_eq!(title_to_slug("Rust & WASM: part_2"), "rust--wasm-part_2");
    }

    #[test]
    fn title_to_slug_drops_non_ascii_letters() {
        assert_eq!(title_to_slug("Café notes"), "caf-notes");
    }

    #[test]
    fn require_fields_treats_whitespace_as_blank() {
        let err = require_fields(&[("title", "  \n"), ("slug", "ok")])
            .expect_err("blank title should be reported");
        assert_eq!(err.missing, vec!["title"]);
        assert!(err.to_string().contains("title"));
    }
}
