//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-collection persistence contract.
//! - Isolate document format details from the command surface.
//!
//! # Invariants
//! - Repositories exchange `EntitySnapshot` trees, never live store ids.

pub mod xml_repo;
