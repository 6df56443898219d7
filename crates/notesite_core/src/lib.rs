//! Core logic for the notesite content site.
//! Rendering, tag reconciliation and data API access live here; routing
//! and templating belong to the embedding application.

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;

pub use api::client::{ApiClient, ApiError, ApiResult};
pub use api::note_api::NoteApi;
pub use api::post_api::PostApi;
pub use api::tag_api::TagApi;
pub use config::{ApiConfig, ConfigError};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::draft::{title_to_slug, DraftValidationError};
pub use model::note::{NewNote, Note, NoteId, NoteSummary};
pub use model::post::Post;
pub use model::tag::{NewTag, Tag, TagId};
pub use render::escape_text;
pub use render::markdown::{MarkdownRenderer, RendererConfig};
pub use render::math::normalize_legacy_math_delimiters;
pub use service::error::{ServiceError, ServiceResult};
pub use service::note_service::{EditableNote, IndexPage, NoteService, NotesIndex, RenderedNote};
pub use service::post_service::{PostService, RenderedPost};
pub use service::tag_reconciler::{apply_tag_diff, diff_tags, parse_tag_ids, TagDiff};
pub use service::tag_service::TagService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
