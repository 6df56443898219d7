//! Note use-case service: page loaders and form actions.
//!
//! # Responsibility
//! - Load and render note pages (by slug, latest, edit view).
//! - Build the notes index with an optional tag filter.
//! - Create, update and delete notes, reconciling tag associations.
//!
//! # Invariants
//! - Independent lookups for one page are issued concurrently; any failure
//!   fails the whole page.
//! - Drafts are validated before any mutation request is sent.
//! - Tag reconciliation runs only after the note write succeeded.

use crate::api::note_api::NoteApi;
use crate::api::tag_api::TagApi;
use crate::model::note::{NewNote, Note, NoteId, NoteSummary};
use crate::model::tag::{find_tag_by_slug, Tag, TagId};
use crate::render::markdown::MarkdownRenderer;
use crate::service::error::{require_markdown, ServiceError, ServiceResult};
use crate::service::tag_reconciler::{apply_tag_diff, diff_tags, TagDiff};
use futures::future::{try_join, try_join_all};
use log::info;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Slug reported when the latest-note lookup comes back empty.
const LATEST_SLUG: &str = "latest";

/// Rendered note ready for embedding in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNote {
    pub slug: String,
    pub title: String,
    pub html: String,
}

/// Sidebar data for the notes index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesIndex {
    pub tags: Vec<Tag>,
    pub notes: Vec<NoteSummary>,
    /// Active tag filter, when one was requested and resolved.
    pub tag_slug: Option<String>,
}

/// Outcome of loading the notes index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPage {
    Listing(NotesIndex),
    /// The requested tag filter names no known tag; callers redirect to the
    /// unfiltered index.
    UnknownTag(String),
}

/// Edit-form state for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableNote {
    pub note: Note,
    /// Tag ids associated when the form was loaded.
    pub initial_tag_ids: BTreeSet<TagId>,
    /// Every tag, for the selection widget.
    pub all_tags: Vec<Tag>,
    pub preview_html: String,
}

/// Note service facade over a data API implementation.
pub struct NoteService<A: NoteApi + TagApi> {
    api: A,
    renderer: Arc<MarkdownRenderer>,
}

impl<A: NoteApi + TagApi> NoteService<A> {
    pub fn new(api: A, renderer: Arc<MarkdownRenderer>) -> Self {
        Self { api, renderer }
    }

    /// Loads and renders one note by slug.
    pub async fn note_page(&self, slug: &str) -> ServiceResult<RenderedNote> {
        let note = self
            .api
            .get_note(slug)
            .await?
            .ok_or_else(|| ServiceError::NoteNotFound(slug.to_string()))?;
        self.render_note(note)
    }

    /// Loads and renders the most recent note.
    pub async fn latest_note_page(&self) -> ServiceResult<RenderedNote> {
        let note = self
            .api
            .latest_note()
            .await?
            .ok_or_else(|| ServiceError::NoteNotFound(LATEST_SLUG.to_string()))?;
        self.render_note(note)
    }

    /// Loads tags and notes, filtering notes by `tag_slug` when given.
    pub async fn notes_index(&self, tag_slug: Option<&str>) -> ServiceResult<IndexPage> {
        let tag_slug = tag_slug.map(str::trim).filter(|slug| !slug.is_empty());
        let Some(tag_slug) = tag_slug else {
            let (tags, notes) = try_join(self.api.list_tags(), self.api.list_notes()).await?;
            return Ok(IndexPage::Listing(NotesIndex {
                tags,
                notes,
                tag_slug: None,
            }));
        };

        let tags = self.api.list_tags().await?;
        let Some(tag_id) = find_tag_by_slug(&tags, tag_slug).map(|tag| tag.id) else {
            info!("event=notes_index module=service status=unknown_tag");
            return Ok(IndexPage::UnknownTag(tag_slug.to_string()));
        };
        let notes = self.api.list_notes_for_tag(tag_id).await?;
        Ok(IndexPage::Listing(NotesIndex {
            tags,
            notes,
            tag_slug: Some(tag_slug.to_string()),
        }))
    }

    /// Loads a note with its current tag ids and the full tag list.
    pub async fn edit_note_page(&self, slug: &str) -> ServiceResult<EditableNote> {
        let note = self
            .api
            .get_note(slug)
            .await?
            .ok_or_else(|| ServiceError::NoteNotFound(slug.to_string()))?;
        let (tag_ids, all_tags) =
            try_join(self.api.tag_ids_for_note(note.id), self.api.list_tags()).await?;
        let preview_html = self.renderer.render(&note.markdown);
        Ok(EditableNote {
            note,
            initial_tag_ids: tag_ids.into_iter().collect(),
            all_tags,
            preview_html,
        })
    }

    /// Renders an editor preview, optionally applying the legacy math
    /// delimiter transform first.
    pub fn preview(&self, markdown: &str, legacy_math: bool) -> String {
        if legacy_math {
            self.renderer.render_legacy(markdown)
        } else {
            self.renderer.render(markdown)
        }
    }

    /// Creates a note, then links each selected tag concurrently.
    pub async fn create_note(
        &self,
        draft: &NewNote,
        tag_ids: &BTreeSet<TagId>,
    ) -> ServiceResult<NoteId> {
        draft.validate()?;
        let note_id = self.api.create_note(draft).await?;
        try_join_all(
            tag_ids
                .iter()
                .map(|tag_id| self.api.link_tag(note_id, *tag_id)),
        )
        .await?;
        info!(
            "event=note_create module=service status=ok note_id={note_id} tags={}",
            tag_ids.len()
        );
        Ok(note_id)
    }

    /// Updates note fields, then reconciles its tag associations.
    ///
    /// Returns the applied association diff.
    pub async fn update_note(
        &self,
        note: &Note,
        initial_tag_ids: &BTreeSet<TagId>,
        desired_tag_ids: &BTreeSet<TagId>,
    ) -> ServiceResult<TagDiff> {
        note.validate()?;
        self.api.update_note(note).await?;
        info!("event=note_update module=service status=ok note_id={}", note.id);

        let diff = diff_tags(initial_tag_ids, desired_tag_ids);
        apply_tag_diff(&self.api, note.id, &diff).await?;
        Ok(diff)
    }

    /// Replaces a note's tag set with `desired`, reading the current set
    /// from the data API first.
    pub async fn set_note_tags(
        &self,
        slug: &str,
        desired: &BTreeSet<TagId>,
    ) -> ServiceResult<TagDiff> {
        let note = self
            .api
            .get_note(slug)
            .await?
            .ok_or_else(|| ServiceError::NoteNotFound(slug.to_string()))?;
        let initial: BTreeSet<TagId> = self
            .api
            .tag_ids_for_note(note.id)
            .await?
            .into_iter()
            .collect();
        let diff = diff_tags(&initial, desired);
        apply_tag_diff(&self.api, note.id, &diff).await?;
        Ok(diff)
    }

    pub async fn delete_note(&self, note_id: NoteId) -> ServiceResult<()> {
        self.api.delete_note(note_id).await?;
        info!("event=note_delete module=service status=ok note_id={note_id}");
        Ok(())
    }

    /// Lists every note summary.
    pub async fn list_notes(&self) -> ServiceResult<Vec<NoteSummary>> {
        Ok(self.api.list_notes().await?)
    }

    fn render_note(&self, note: Note) -> ServiceResult<RenderedNote> {
        require_markdown(&note.slug, &note.markdown)?;
        let html = self.renderer.render(&note.markdown);
        Ok(RenderedNote {
            slug: note.slug,
            title: note.title,
            html,
        })
    }
}
