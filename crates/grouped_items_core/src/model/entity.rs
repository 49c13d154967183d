//! Display entity domain model.
//!
//! # Responsibility
//! - Define the single record shape shared by items and groups.
//! - Expose identity, label and parent linkage; nothing else.
//!
//! # Invariants
//! - `uid` is minted once and never reused for another entity.
//! - `parent` and `children` are only changed by `EntityStore` container
//!   operations, which keep both sides of the link in sync.
//! - Items never have children.

use crate::model::level::{level_of, EntityKind, Level};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one display entity.
///
/// Kept as a type alias so signatures read as intent, not as transport type.
pub type EntityId = Uuid;

/// One item or group held by an `EntityStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntity {
    uid: EntityId,
    name: String,
    kind: EntityKind,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

impl DisplayEntity {
    /// Creates a detached entity with a freshly generated id.
    pub(crate) fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), kind, name)
    }

    /// Creates a detached entity with a caller-provided id.
    ///
    /// Used by snapshot materialization where identity already exists.
    pub(crate) fn with_id(uid: EntityId, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn uid(&self) -> EntityId {
        self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Owning group, if any.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Ordered child ids. Always empty for items.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn is_group(&self) -> bool {
        self.kind == EntityKind::Group
    }

    /// Derived level; see `level_of`.
    pub fn level(&self) -> Level {
        level_of(self.kind, self.parent.is_some())
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<EntityId> {
        &mut self.children
    }
}

/// Owned, detached value tree of one entity and its descendants.
///
/// Used as the exchange shape for persistence, CLI output and comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity id at the time the snapshot was taken (or read).
    pub uid: EntityId,
    /// Display label; may be empty.
    pub name: String,
    /// Level as observed (or as serialized, for read documents).
    pub level: Level,
    /// Children in display order. Empty for items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntitySnapshot>,
}

impl EntitySnapshot {
    /// Snapshot of a leaf entity.
    pub fn item(name: impl Into<String>) -> Self {
        Self {
            uid: Uuid::new_v4(),
            name: name.into(),
            level: Level::Ungrouped,
            children: Vec::new(),
        }
    }

    /// Snapshot of a container with the given children.
    pub fn group(name: impl Into<String>, children: Vec<EntitySnapshot>) -> Self {
        Self {
            uid: Uuid::new_v4(),
            name: name.into(),
            level: Level::Parent,
            children,
        }
    }

    pub fn is_group(&self) -> bool {
        self.level.is_container()
    }

    /// Number of entities in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(EntitySnapshot::subtree_len)
            .sum::<usize>()
    }

    /// Names and nesting only, rendered as `name{child,child}`.
    ///
    /// Two snapshots with equal outlines are entity-equivalent regardless of
    /// their ids.
    pub fn outline(&self) -> String {
        if !self.is_group() {
            return self.name.clone();
        }
        let inner = self
            .children
            .iter()
            .map(EntitySnapshot::outline)
            .collect::<Vec<_>>()
            .join(",");
        format!("{}{{{inner}}}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayEntity, EntitySnapshot};
    use crate::model::level::{EntityKind, Level};

    #[test]
    fn new_entity_is_detached() {
        let entity = DisplayEntity::new(EntityKind::Item, "item");
        assert!(!entity.uid().is_nil());
        assert_eq!(entity.parent(), None);
        assert!(entity.children().is_empty());
        assert_eq!(entity.level(), Level::Ungrouped);
    }

    #[test]
    fn empty_group_is_still_parent() {
        let group = DisplayEntity::new(EntityKind::Group, "group");
        assert_eq!(group.level(), Level::Parent);
    }

    #[test]
    fn outline_renders_nesting() {
        let tree = EntitySnapshot::group(
            "outer",
            vec![
                EntitySnapshot::group("inner", vec![EntitySnapshot::item("a")]),
                EntitySnapshot::item("b"),
                EntitySnapshot::group("empty", Vec::new()),
            ],
        );
        assert_eq!(tree.outline(), "outer{inner{a},b,empty{}}");
        assert_eq!(tree.subtree_len(), 5);
    }
}
