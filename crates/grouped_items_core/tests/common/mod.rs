use grouped_items_core::{level_of, DisplayCollection, EntityId};
use std::collections::HashSet;

/// Walks the placed tree and checks the parent/child links, levels and
/// selection against each other.
pub fn assert_tree_consistent(collection: &DisplayCollection) {
    let store = collection.store();
    let mut reached = HashSet::new();
    let mut pending: Vec<(Option<EntityId>, EntityId)> = collection
        .top_level()
        .iter()
        .map(|id| (None, *id))
        .collect();

    while let Some((parent, id)) = pending.pop() {
        assert!(reached.insert(id), "entity {id} is reachable twice");
        let entity = store
            .get(id)
            .unwrap_or_else(|| panic!("placed entity {id} is missing from the store"));
        assert_eq!(entity.parent(), parent, "parent link of {id}");
        assert_eq!(
            entity.level(),
            level_of(entity.kind(), parent.is_some()),
            "level of {id}"
        );
        pending.extend(entity.children().iter().map(|child| (Some(id), *child)));
    }

    for id in collection.selection().iter() {
        assert!(reached.contains(id), "selected entity {id} is not placed");
    }
}
