//! Core use-case services.
//!
//! # Responsibility
//! - Compose data API calls and rendering into page loaders and actions.
//! - Keep view/routing layers decoupled from transport details.

pub mod error;
pub mod note_service;
pub mod post_service;
pub mod tag_reconciler;
pub mod tag_service;
