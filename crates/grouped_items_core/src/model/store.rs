//! Entity arena and container operations.
//!
//! # Responsibility
//! - Own every live display entity, addressed by `EntityId`.
//! - Implement the group-level operations (add, insert, remove, reorder,
//!   deep copy) while keeping parent and child links in sync.
//!
//! # Invariants
//! - For every group `g` and every child `c` of `g`: `c.parent == Some(g)`.
//! - An entity appears in at most one child list.
//! - A group is never placed inside itself or one of its descendants.
//! - Removing a child from a group clears the child's parent link.

use crate::engine::sequence::{self, MoveStep};
use crate::model::entity::{DisplayEntity, EntityId, EntitySnapshot};
use crate::model::level::{EntityKind, Level};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Result type used by entity store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from entity store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Id is not present in the store.
    EntityNotFound(EntityId),
    /// Container operation targeted an item.
    NotAGroup(EntityId),
    /// Placing `entity` under `container` would nest a group inside itself.
    CycleDetected {
        entity: EntityId,
        container: EntityId,
    },
    /// Explicit id is already used by another entity.
    DuplicateId(EntityId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityNotFound(id) => write!(f, "display entity not found: {id}"),
            Self::NotAGroup(id) => write!(f, "display entity is not a group: {id}"),
            Self::CycleDetected { entity, container } => write!(
                f,
                "placing {entity} under {container} would nest a group inside itself"
            ),
            Self::DuplicateId(id) => write!(f, "display entity id already in use: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Arena of display entities.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: HashMap<EntityId, DisplayEntity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one detached item.
    pub fn create_item(&mut self, name: impl Into<String>) -> EntityId {
        self.register(DisplayEntity::new(EntityKind::Item, name))
    }

    /// Creates one detached, empty group.
    pub fn create_group(&mut self, name: impl Into<String>) -> EntityId {
        self.register(DisplayEntity::new(EntityKind::Group, name))
    }

    /// Creates one detached entity with a caller-provided id.
    ///
    /// # Errors
    /// - `DuplicateId` when `uid` is nil or already used.
    pub fn insert_with_id(
        &mut self,
        uid: EntityId,
        kind: EntityKind,
        name: impl Into<String>,
    ) -> StoreResult<EntityId> {
        if uid.is_nil() || self.entities.contains_key(&uid) {
            return Err(StoreError::DuplicateId(uid));
        }
        Ok(self.register(DisplayEntity::with_id(uid, kind, name)))
    }

    pub fn get(&self, id: EntityId) -> Option<&DisplayEntity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of entities alive in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn level(&self, id: EntityId) -> Option<Level> {
        self.get(id).map(DisplayEntity::level)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(DisplayEntity::parent)
    }

    /// Child ids of `id`; empty for items and unknown ids.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.get(id).map(DisplayEntity::children).unwrap_or(&[])
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.get(id).map(DisplayEntity::name)
    }

    pub fn rename(&mut self, id: EntityId, name: impl Into<String>) -> StoreResult<()> {
        self.entity_mut(id)?.set_name(name);
        Ok(())
    }

    /// Ids of every entity without a parent: top-level, buffered or unplaced.
    pub fn detached(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.parent().is_none())
            .map(DisplayEntity::uid)
            .collect()
    }

    /// Returns whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut visited = HashSet::new();
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            if !visited.insert(current) {
                return false;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Appends `child` to `group` and sets its parent.
    ///
    /// A child currently held by another group is taken out of it first.
    pub fn add(&mut self, group: EntityId, child: EntityId) -> StoreResult<()> {
        let len = self.children_of_group(group)?.len();
        self.place(group, child, |_| len).map(|_| ())
    }

    /// Sequential `add`, preserving input order.
    pub fn add_range(&mut self, group: EntityId, children: &[EntityId]) -> StoreResult<()> {
        for child in children {
            self.add(group, *child)?;
        }
        Ok(())
    }

    /// Inserts `child` at the lowest index any of `selection` occupies in
    /// `group`, or at the front when none of them is a child of `group`.
    ///
    /// Returns the index the child landed at.
    pub fn insert(
        &mut self,
        group: EntityId,
        child: EntityId,
        selection: &[EntityId],
    ) -> StoreResult<usize> {
        let index = sequence::lowest_index_among(self.children_of_group(group)?, selection);
        self.place(group, child, |_| index)
    }

    /// Inserts `child` into `group` at an explicit index (clamped).
    pub fn insert_at(
        &mut self,
        group: EntityId,
        index: usize,
        child: EntityId,
    ) -> StoreResult<usize> {
        self.place(group, child, |len| index.min(len))
    }

    /// Promotes `child` into `group` at the position its current parent
    /// occupies there, so it lands right before its former container.
    ///
    /// Returns `(former_parent, removed_at, inserted_at)`.
    ///
    /// # Errors
    /// - `EntityNotFound` when `child` has no parent or its parent is not a
    ///   child of `group`.
    pub fn insert_at_parent_index(
        &mut self,
        group: EntityId,
        child: EntityId,
    ) -> StoreResult<(EntityId, usize, usize)> {
        let former = self.parent(child).ok_or(StoreError::EntityNotFound(child))?;
        let parent_index = sequence::position(self.children_of_group(group)?, &former)
            .ok_or(StoreError::EntityNotFound(former))?;
        let removed_at = self.remove(former, child)?.unwrap_or(0);
        let inserted_at = self.place(group, child, |len| parent_index.min(len))?;
        Ok((former, removed_at, inserted_at))
    }

    /// Removes `child` from `group` and clears its parent link.
    ///
    /// Returns the index it was removed from, or `None` if it was not there.
    pub fn remove(&mut self, group: EntityId, child: EntityId) -> StoreResult<Option<usize>> {
        let children = self.group_mut(group)?.children_mut();
        let Some(index) = sequence::position(children, &child) else {
            return Ok(None);
        };
        children.remove(index);
        if let Some(entity) = self.entities.get_mut(&child) {
            entity.set_parent(None);
        }
        Ok(Some(index))
    }

    /// Takes `id` out of its current group, if any.
    ///
    /// Returns `(former_parent, index)` when something was detached.
    pub fn detach(&mut self, id: EntityId) -> StoreResult<Option<(EntityId, usize)>> {
        let Some(parent) = self.get(id).ok_or(StoreError::EntityNotFound(id))?.parent() else {
            return Ok(None);
        };
        Ok(self.remove(parent, id)?.map(|index| (parent, index)))
    }

    /// Reorders selected children of `group` one slot toward the front.
    pub fn move_children_up(
        &mut self,
        group: EntityId,
        selected: &[EntityId],
    ) -> StoreResult<Vec<MoveStep>> {
        Ok(sequence::move_up(self.group_mut(group)?.children_mut(), selected))
    }

    /// Reorders selected children of `group` one slot toward the back.
    pub fn move_children_down(
        &mut self,
        group: EntityId,
        selected: &[EntityId],
    ) -> StoreResult<Vec<MoveStep>> {
        Ok(sequence::move_down(self.group_mut(group)?.children_mut(), selected))
    }

    /// Deep copy of `id`: fresh ids throughout, same names and nesting.
    ///
    /// The copy is detached; callers place it with a container operation.
    pub fn copy(&mut self, id: EntityId) -> StoreResult<EntityId> {
        let source = self.get(id).ok_or(StoreError::EntityNotFound(id))?;
        let kind = source.kind();
        let name = source.name().to_string();
        let children = source.children().to_vec();

        let copy = self.register(DisplayEntity::new(kind, name));
        for child in children {
            let child_copy = self.copy(child)?;
            self.add(copy, child_copy)?;
        }
        Ok(copy)
    }

    /// Drops `id` and its whole subtree from the arena.
    ///
    /// The entity is detached from its parent first. Returns how many
    /// entities were dropped.
    pub fn purge(&mut self, id: EntityId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        let _ = self.detach(id);

        let mut dropped = 0;
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(entity) = self.entities.remove(&current) {
                pending.extend_from_slice(entity.children());
                dropped += 1;
            }
        }
        dropped
    }

    /// Owned value tree of `id`.
    pub fn snapshot(&self, id: EntityId) -> StoreResult<EntitySnapshot> {
        let entity = self.get(id).ok_or(StoreError::EntityNotFound(id))?;
        let children = entity
            .children()
            .iter()
            .map(|child| self.snapshot(*child))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(EntitySnapshot {
            uid: entity.uid(),
            name: entity.name().to_string(),
            level: entity.level(),
            children,
        })
    }

    /// Creates detached entities mirroring `snapshot`.
    ///
    /// Snapshot ids are kept when unused; ids that collide are regenerated.
    pub fn materialize(&mut self, snapshot: &EntitySnapshot) -> StoreResult<EntityId> {
        let kind = snapshot.level.kind();
        let uid = if snapshot.uid.is_nil() || self.contains(snapshot.uid) {
            Uuid::new_v4()
        } else {
            snapshot.uid
        };
        let id = self.insert_with_id(uid, kind, snapshot.name.as_str())?;
        if kind == EntityKind::Group {
            for child in &snapshot.children {
                let child_id = self.materialize(child)?;
                self.add(id, child_id)?;
            }
        }
        Ok(id)
    }

    fn register(&mut self, entity: DisplayEntity) -> EntityId {
        let id = entity.uid();
        self.entities.insert(id, entity);
        id
    }

    fn entity_mut(&mut self, id: EntityId) -> StoreResult<&mut DisplayEntity> {
        self.entities
            .get_mut(&id)
            .ok_or(StoreError::EntityNotFound(id))
    }

    fn group_mut(&mut self, id: EntityId) -> StoreResult<&mut DisplayEntity> {
        let entity = self.entity_mut(id)?;
        if !entity.is_group() {
            return Err(StoreError::NotAGroup(id));
        }
        Ok(entity)
    }

    fn children_of_group(&self, id: EntityId) -> StoreResult<&[EntityId]> {
        let entity = self.get(id).ok_or(StoreError::EntityNotFound(id))?;
        if !entity.is_group() {
            return Err(StoreError::NotAGroup(id));
        }
        Ok(entity.children())
    }

    /// Detaches `child` and inserts it into `group` at `index_for(len)`,
    /// where `len` is the child count after detaching.
    fn place(
        &mut self,
        group: EntityId,
        child: EntityId,
        index_for: impl FnOnce(usize) -> usize,
    ) -> StoreResult<usize> {
        self.children_of_group(group)?;
        if !self.contains(child) {
            return Err(StoreError::EntityNotFound(child));
        }
        if child == group || self.is_ancestor(child, group) {
            return Err(StoreError::CycleDetected {
                entity: child,
                container: group,
            });
        }

        self.detach(child)?;
        let children = self.group_mut(group)?.children_mut();
        let index = index_for(children.len()).min(children.len());
        children.insert(index, child);
        self.entity_mut(child)?.set_parent(Some(group));
        Ok(index)
    }
}
