//! Core use-case services.
//!
//! # Responsibility
//! - Expose the selection-driven command surface (`DisplayCollection`).
//! - Provide its collaborators: change notifications and name generators.

pub mod display_collection;
pub mod events;
pub mod naming;
