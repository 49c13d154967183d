//! Selection resolution and ordered-sequence algorithms.
//!
//! # Responsibility
//! - Reduce arbitrary selections to non-overlapping work sets.
//! - Reorder entities inside one sequence without touching the hierarchy.
//!
//! # Invariants
//! - `GroupingEngine` queries never mutate the store.
//! - Only `sequence::move_up` / `sequence::move_down` mutate a sequence.

pub mod grouping;
pub mod sequence;
