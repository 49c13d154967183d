use grouped_items_core::{DisplayCollection, EntityId};

mod common;

fn placed_items(collection: &mut DisplayCollection, names: &[&str]) -> Vec<EntityId> {
    names
        .iter()
        .map(|name| {
            let item = collection.create_item(*name);
            collection.add_as_ungrouped(item).unwrap();
            item
        })
        .collect()
}

fn group_of(
    collection: &mut DisplayCollection,
    name: &str,
    children: &[&str],
) -> (EntityId, Vec<EntityId>) {
    let group = collection.create_group(name);
    let mut ids = Vec::new();
    for child in children {
        let item = collection.create_item(*child);
        collection.add_to_group(group, item).unwrap();
        ids.push(item);
    }
    (group, ids)
}

#[test]
fn move_up_swaps_with_previous_sibling() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["a", "b", "c", "d"]);
    collection.set_selection([ids[2]]).unwrap();

    assert_eq!(collection.move_up().unwrap(), 1);

    assert_eq!(collection.top_level(), &[ids[0], ids[2], ids[1], ids[3]]);
    assert_eq!(collection.selection().to_vec(), vec![ids[2]]);
    common::assert_tree_consistent(&collection);
}

#[test]
fn move_down_shifts_a_block_together() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["a", "b", "c", "d"]);
    collection.set_selection([ids[0], ids[1]]).unwrap();

    assert_eq!(collection.move_down().unwrap(), 2);

    assert_eq!(collection.top_level(), &[ids[2], ids[0], ids[1], ids[3]]);
    common::assert_tree_consistent(&collection);
}

#[test]
fn batch_at_boundary_does_not_move() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["a", "b", "c"]);

    collection.set_selection([ids[0], ids[2]]).unwrap();
    assert_eq!(collection.move_up().unwrap(), 0);
    assert_eq!(collection.move_down().unwrap(), 0);

    assert_eq!(collection.top_level(), ids.as_slice());
    common::assert_tree_consistent(&collection);
}

#[test]
fn children_move_inside_their_group() {
    let mut collection = DisplayCollection::new();
    let top = placed_items(&mut collection, &["a"]);
    let (group, children) = group_of(&mut collection, "G", &["x", "y", "z"]);
    collection.add_as_ungrouped(group).unwrap();
    collection.set_selection([children[2]]).unwrap();

    collection.move_up().unwrap();

    assert_eq!(
        collection.store().children(group),
        &[children[0], children[2], children[1]]
    );
    assert_eq!(collection.top_level(), &[top[0], group]);
    common::assert_tree_consistent(&collection);
}

#[test]
fn top_level_and_child_partitions_move_independently() {
    let mut collection = DisplayCollection::new();
    let top = placed_items(&mut collection, &["a"]);
    let (group, children) = group_of(&mut collection, "G", &["x", "y"]);
    collection.add_as_ungrouped(group).unwrap();
    collection.set_selection([group, children[1]]).unwrap();

    assert_eq!(collection.move_up().unwrap(), 2);

    assert_eq!(collection.top_level(), &[group, top[0]]);
    assert_eq!(collection.store().children(group), &[children[1], children[0]]);
    common::assert_tree_consistent(&collection);
}

#[test]
fn children_of_different_groups_move_in_their_own_groups() {
    let mut collection = DisplayCollection::new();
    let (first, first_children) = group_of(&mut collection, "first", &["a", "b"]);
    let (second, second_children) = group_of(&mut collection, "second", &["c", "d"]);
    collection.add_as_ungrouped(first).unwrap();
    collection.add_as_ungrouped(second).unwrap();
    collection
        .set_selection([first_children[1], second_children[1]])
        .unwrap();

    collection.move_up().unwrap();

    assert_eq!(
        collection.store().children(first),
        &[first_children[1], first_children[0]]
    );
    assert_eq!(
        collection.store().children(second),
        &[second_children[1], second_children[0]]
    );
    assert_eq!(collection.top_level(), &[first, second]);
    common::assert_tree_consistent(&collection);
}
