//! Markdown → HTML rendering pipeline.
//!
//! # Responsibility
//! - Convert site-owner markdown into embeddable HTML.
//! - Highlight fenced code blocks and typeset `$`/`$$` math.
//!
//! # Invariants
//! - Rendering never fails: highlight and math errors degrade to escaped
//!   source text.
//! - A renderer is immutable after construction and safe to share.

pub mod highlight;
pub mod markdown;
pub mod math;

use pulldown_cmark_escape::{escape_html, FmtWriter};

/// Escapes text for HTML element content or double-quoted attributes.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    // Writing into a `String` cannot fail.
    let _ = escape_html(FmtWriter(&mut escaped), value);
    escaped
}
