//! Structural classification of display entities.
//!
//! # Responsibility
//! - Derive the four-state `Level` from entity kind and parent presence.
//! - Provide the predicates every higher layer is expressed in.
//!
//! # Invariants
//! - `Level` is never stored; it is recomputed on every read.
//! - A group's level does not depend on its child count.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Entity kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Leaf entity.
    Item,
    /// Container entity with ordered children.
    Group,
}

/// Derived structural position of one entity.
///
/// Serialized with the wire names used by the XML document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Item without a containing group.
    Ungrouped,
    /// Item inside a group.
    Child,
    /// Group without a containing group.
    Parent,
    /// Group inside another group.
    ParentChild,
}

impl Level {
    /// Stable wire text for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ungrouped => "Ungrouped",
            Self::Child => "Child",
            Self::Parent => "Parent",
            Self::ParentChild => "ParentChild",
        }
    }

    /// Parses wire text back into a level. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Ungrouped" => Some(Self::Ungrouped),
            "Child" => Some(Self::Child),
            "Parent" => Some(Self::Parent),
            "ParentChild" => Some(Self::ParentChild),
            _ => None,
        }
    }

    /// `Ungrouped` or `Parent`.
    pub fn is_top_level(self) -> bool {
        matches!(self, Self::Ungrouped | Self::Parent)
    }

    /// `Parent` or `ParentChild`.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Parent | Self::ParentChild)
    }

    /// `Child` or `ParentChild`.
    pub fn is_contained(self) -> bool {
        matches!(self, Self::Child | Self::ParentChild)
    }

    /// Kind implied by this level.
    pub fn kind(self) -> EntityKind {
        if self.is_container() {
            EntityKind::Group
        } else {
            EntityKind::Item
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an entity from its kind and whether it currently has a parent.
pub fn level_of(kind: EntityKind, has_parent: bool) -> Level {
    match (kind, has_parent) {
        (EntityKind::Item, false) => Level::Ungrouped,
        (EntityKind::Item, true) => Level::Child,
        (EntityKind::Group, false) => Level::Parent,
        (EntityKind::Group, true) => Level::ParentChild,
    }
}
