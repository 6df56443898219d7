//! Data API access layer.
//!
//! # Responsibility
//! - Provide one authenticated JSON client for the remote data API.
//! - Define use-case oriented contracts (`NoteApi`, `TagApi`, `PostApi`)
//!   so services stay independent of transport details.
//!
//! # Invariants
//! - Every request carries the configured bearer credential.
//! - Single-entity lookups map HTTP 404 and JSON `null` to `None`.

pub mod client;
pub mod note_api;
pub mod post_api;
pub mod tag_api;
