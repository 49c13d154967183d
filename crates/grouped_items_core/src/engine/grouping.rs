//! Read-only selection queries over an `EntityStore`.
//!
//! # Responsibility
//! - Classify entities by id (level predicates, owning group).
//! - Resolve raw selections into non-overlapping work sets.
//!
//! # Invariants
//! - `distinct` never returns an entity together with one of its ancestors.
//! - Results follow selection order, except that `distinct` lists the
//!   highest selected containers first. Unknown ids are dropped.

use crate::engine::sequence;
use crate::model::entity::EntityId;
use crate::model::level::Level;
use crate::model::store::{EntityStore, StoreResult};
use std::collections::HashSet;

/// Selection resolution bound to one entity store.
#[derive(Debug, Clone, Copy)]
pub struct GroupingEngine<'a> {
    store: &'a EntityStore,
}

impl<'a> GroupingEngine<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    pub fn level(&self, id: EntityId) -> Option<Level> {
        self.store.level(id)
    }

    pub fn is_top_level(&self, id: EntityId) -> bool {
        self.level(id).is_some_and(Level::is_top_level)
    }

    pub fn is_container(&self, id: EntityId) -> bool {
        self.level(id).is_some_and(Level::is_container)
    }

    pub fn is_contained(&self, id: EntityId) -> bool {
        self.level(id).is_some_and(Level::is_contained)
    }

    /// Container with no children.
    pub fn is_childless_container(&self, id: EntityId) -> bool {
        self.is_container(id) && self.store.children(id).is_empty()
    }

    /// No parent, or a parent that itself has no parent.
    pub fn is_grandparentless(&self, id: EntityId) -> bool {
        match self.store.parent(id) {
            None => true,
            Some(parent) => self.store.parent(parent).is_none(),
        }
    }

    /// Group one level up from a contained entity; `None` for top-level ones.
    pub fn owner_of(&self, id: EntityId) -> Option<EntityId> {
        if self.is_contained(id) {
            self.store.parent(id)
        } else {
            None
        }
    }

    /// See `sequence::lowest_index_among`.
    pub fn lowest_index_among(&self, sequence: &[EntityId], selection: &[EntityId]) -> usize {
        sequence::lowest_index_among(sequence, selection)
    }

    /// Whether every distinct selected entity shares the owner of the first.
    ///
    /// Top-level entities all share the `None` owner. Empty selections fail.
    pub fn belong_to_same_group(&self, selection: &[EntityId]) -> bool {
        let distinct = self.distinct(selection);
        let Some(first) = distinct.first() else {
            return false;
        };
        let owner = self.owner_of(*first);
        distinct.iter().all(|id| self.owner_of(*id) == owner)
    }

    /// For every selected container, the outermost container reached by
    /// walking up while the parent is selected too. Deduplicated.
    pub fn highest_selected_containers(&self, selection: &[EntityId]) -> Vec<EntityId> {
        let selected = self.known(selection);
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for id in selection {
            if !selected.contains(id) || !self.is_container(*id) {
                continue;
            }
            let mut highest = *id;
            while let Some(parent) = self.store.parent(highest) {
                if !selected.contains(&parent) {
                    break;
                }
                highest = parent;
            }
            if seen.insert(highest) {
                result.push(highest);
            }
        }
        result
    }

    /// Minimal non-overlapping work set: selected entities none of whose
    /// ancestors is selected. Highest selected containers come first, then
    /// the remaining entities in selection order.
    pub fn distinct(&self, selection: &[EntityId]) -> Vec<EntityId> {
        let selected = self.known(selection);
        let mut seen = HashSet::new();
        self.highest_selected_containers(selection)
            .into_iter()
            .chain(selection.iter().copied())
            .filter(|id| selected.contains(id))
            .filter(|id| !self.has_selected_ancestor(*id, &selected))
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Distinct selected entities that sit inside some container.
    pub fn movable(&self, selection: &[EntityId]) -> Vec<EntityId> {
        self.distinct(selection)
            .into_iter()
            .filter(|id| !self.is_top_level(*id))
            .collect()
    }

    pub fn any_top_level(&self, selection: &[EntityId]) -> bool {
        selection.iter().any(|id| self.is_top_level(*id))
    }

    /// Non-empty and made of containers only.
    pub fn all_containers(&self, sequence: &[EntityId]) -> bool {
        !sequence.is_empty() && sequence.iter().all(|id| self.is_container(*id))
    }

    fn known(&self, selection: &[EntityId]) -> HashSet<EntityId> {
        selection
            .iter()
            .copied()
            .filter(|id| self.store.contains(*id))
            .collect()
    }

    fn has_selected_ancestor(&self, id: EntityId, selected: &HashSet<EntityId>) -> bool {
        let mut visited = HashSet::new();
        let mut cursor = self.store.parent(id);
        while let Some(current) = cursor {
            if selected.contains(&current) {
                return true;
            }
            if !visited.insert(current) {
                return false;
            }
            cursor = self.store.parent(current);
        }
        false
    }
}

/// Deep copies of every distinct selected entity, detached, in distinct order.
pub fn clone_selection(
    store: &mut EntityStore,
    selection: &[EntityId],
) -> StoreResult<Vec<EntityId>> {
    let distinct = GroupingEngine::new(store).distinct(selection);
    distinct.into_iter().map(|id| store.copy(id)).collect()
}
