use grouped_items_core::{CollectionError, DisplayCollection, EntityId, Level};
use uuid::Uuid;

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

fn placed_group(
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
    collection.add_as_ungrouped(group).unwrap();
    (group, ids)
}

fn outline(collection: &DisplayCollection) -> String {
    collection
        .snapshot()
        .unwrap()
        .iter()
        .map(|snapshot| snapshot.outline())
        .collect::<Vec<_>>()
        .join(",")
}

#[test]
fn grouping_selected_top_level_items() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A", "B", "C"]);
    collection.set_selection([ids[1], ids[2]]).unwrap();

    let group = collection.group("G").unwrap().unwrap();

    assert_eq!(collection.top_level(), &[ids[0], group]);
    assert_eq!(collection.store().children(group), &[ids[1], ids[2]]);
    assert_eq!(collection.level(group), Some(Level::Parent));
    assert_eq!(collection.level(ids[1]), Some(Level::Child));
    assert_eq!(collection.selection().to_vec(), vec![group]);
    common::assert_tree_consistent(&collection);
}

#[test]
fn grouping_children_nests_a_new_group_in_place() {
    let mut collection = DisplayCollection::new();
    let (outer, children) = placed_group(&mut collection, "outer", &["a", "b", "c"]);
    collection.set_selection([children[1], children[2]]).unwrap();

    let inner = collection.group("inner").unwrap().unwrap();

    assert_eq!(collection.store().children(outer), &[children[0], inner]);
    assert_eq!(collection.level(inner), Some(Level::ParentChild));
    assert_eq!(collection.store().parent(children[1]), Some(inner));
    assert_eq!(outline(&collection), "outer{a,inner{b,c}}");
    common::assert_tree_consistent(&collection);
}

#[test]
fn grouping_across_groups_creates_nothing() {
    let mut collection = DisplayCollection::new();
    let (_, first) = placed_group(&mut collection, "first", &["a"]);
    let (_, second) = placed_group(&mut collection, "second", &["b"]);
    collection.set_selection([first[0], second[0]]).unwrap();
    let entities_before = collection.store().len();

    assert_eq!(collection.group("G").unwrap(), None);

    assert_eq!(collection.store().len(), entities_before);
    assert_eq!(collection.selection().to_vec(), vec![first[0], second[0]]);
    assert_eq!(outline(&collection), "first{a},second{b}");
    common::assert_tree_consistent(&collection);
}

#[test]
fn grouping_without_selection_creates_nothing() {
    let mut collection = DisplayCollection::new();
    placed_items(&mut collection, &["A"]);

    assert_eq!(collection.group("G").unwrap(), None);
    assert_eq!(collection.len(), 1);
    common::assert_tree_consistent(&collection);
}

#[test]
fn grouping_a_group_and_its_child_moves_the_group_only() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A"]);
    let (group, children) = placed_group(&mut collection, "G", &["x"]);
    collection.set_selection([group, children[0]]).unwrap();

    let wrapper = collection.group("H").unwrap().unwrap();

    assert_eq!(collection.top_level(), &[ids[0], wrapper]);
    assert_eq!(collection.store().children(wrapper), &[group]);
    assert_eq!(collection.store().children(group), &[children[0]]);
    assert_eq!(collection.level(group), Some(Level::ParentChild));
    common::assert_tree_consistent(&collection);
}

#[test]
fn grouping_mixed_selection_puts_containers_first() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A"]);
    let (group, _) = placed_group(&mut collection, "G", &["x"]);
    let tail = placed_items(&mut collection, &["B"]);
    collection.set_selection([ids[0], group, tail[0]]).unwrap();

    let wrapper = collection.group("H").unwrap().unwrap();

    assert_eq!(collection.top_level(), &[wrapper]);
    assert_eq!(outline(&collection), "H{G{x},A,B}");
    common::assert_tree_consistent(&collection);
}

#[test]
fn generated_group_names_count_up() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A", "B"]);

    collection.set_selection([ids[0]]).unwrap();
    let first = collection.group_with_generated_name().unwrap().unwrap();
    collection.set_selection([ids[1]]).unwrap();
    let second = collection.group_with_generated_name().unwrap().unwrap();

    assert_eq!(collection.store().name(first), Some("Group 1"));
    assert_eq!(collection.store().name(second), Some("Group 2"));
    common::assert_tree_consistent(&collection);
}

#[test]
fn move_to_appends_selection_to_a_prepared_group() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A", "B"]);
    let bucket = collection.create_group("bucket");
    let z = collection.create_item("z");
    collection.add_to_group(bucket, z).unwrap();
    collection.set_selection([ids[1]]).unwrap();

    assert!(collection.move_to(bucket).unwrap());

    assert_eq!(collection.top_level(), &[ids[0], bucket]);
    assert_eq!(collection.store().children(bucket), &[z, ids[1]]);
    common::assert_tree_consistent(&collection);
}

#[test]
fn move_to_rejects_bad_targets() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A"]);
    let (placed, _) = placed_group(&mut collection, "placed", &[]);
    let stranger = Uuid::new_v4();
    collection.set_selection([ids[0]]).unwrap();

    assert_eq!(
        collection.move_to(ids[0]).unwrap_err(),
        CollectionError::NotAGroup(ids[0])
    );
    assert_eq!(
        collection.move_to(placed).unwrap_err(),
        CollectionError::AlreadyPlaced(placed)
    );
    assert_eq!(
        collection.move_to(stranger).unwrap_err(),
        CollectionError::UnknownEntity(stranger)
    );
    common::assert_tree_consistent(&collection);
}

#[test]
fn same_group_checks_follow_distinct_selection() {
    let mut collection = DisplayCollection::new();
    let (group, children) = placed_group(&mut collection, "G", &["x", "y"]);
    let ids = placed_items(&mut collection, &["A"]);

    collection.set_selection([children[0], children[1]]).unwrap();
    assert!(collection.belong_to_same_group());
    assert!(collection.only_children_selected());

    collection.set_selection([group, children[0], ids[0]]).unwrap();
    assert!(collection.belong_to_same_group());
    assert!(!collection.only_children_selected());

    collection.set_selection([children[0], ids[0]]).unwrap();
    assert!(!collection.belong_to_same_group());

    collection.clear_selection();
    assert!(!collection.belong_to_same_group());
    assert!(!collection.only_children_selected());
    common::assert_tree_consistent(&collection);
}
