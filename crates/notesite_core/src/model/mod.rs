//! Domain model for notes, tags and posts served by the data API.
//!
//! # Responsibility
//! - Define the JSON shapes exchanged with the data API.
//! - Validate drafts before any mutation is submitted.
//!
//! # Invariants
//! - Every persisted entity is identified by a numeric id and a unique slug.
//! - Slug uniqueness is enforced by the data API, not here.

pub mod draft;
pub mod note;
pub mod post;
pub mod tag;
