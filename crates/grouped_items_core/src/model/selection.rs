//! Ordered, duplicate-free selection of entity ids.

use crate::model::entity::EntityId;
use indexmap::IndexSet;

/// Current selection held by the collection.
///
/// Insertion order is preserved; re-selecting an id keeps its first position.
/// The selection never owns the entities it refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: IndexSet<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one id. Returns `false` when it was already selected.
    pub fn insert(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }

    /// Removes one id, preserving the order of the rest.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        self.ids.shift_remove(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replaces the whole selection.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Keeps only ids accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&EntityId) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn first(&self) -> Option<EntityId> {
        self.ids.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.ids.iter()
    }

    /// Owned copy in selection order.
    pub fn to_vec(&self) -> Vec<EntityId> {
        self.ids.iter().copied().collect()
    }
}

impl FromIterator<EntityId> for Selection {
    fn from_iter<T: IntoIterator<Item = EntityId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
