//! Display entity domain model.
//!
//! # Responsibility
//! - Define items, groups and their derived structural `Level`.
//! - Own live entities in an id-addressed arena (`EntityStore`).
//! - Hold the ordered selection of entity ids.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId` minted at creation.
//! - Parent and child links are only changed through `EntityStore`.

pub mod entity;
pub mod level;
pub mod selection;
pub mod store;
