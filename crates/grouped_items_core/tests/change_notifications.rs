use grouped_items_core::{CollectionChange, DisplayCollection, EntityId};
use std::cell::RefCell;
use std::rc::Rc;

mod common;

fn recorded(collection: &mut DisplayCollection) -> Rc<RefCell<Vec<CollectionChange>>> {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    collection.subscribe(move |change| sink.borrow_mut().push(*change));
    changes
}

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

#[test]
fn add_reports_insert_position() {
    let mut collection = DisplayCollection::new();
    let changes = recorded(&mut collection);

    let item = collection.create_item("item");
    collection.add(item).unwrap();

    assert_eq!(
        changes.borrow().as_slice(),
        &[CollectionChange::Inserted {
            container: None,
            entity: item,
            index: 0
        }]
    );
    common::assert_tree_consistent(&collection);
}

#[test]
fn grouping_reports_removals_then_group_insert() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A", "B", "C"]);
    collection.set_selection([ids[1], ids[2]]).unwrap();
    let changes = recorded(&mut collection);

    let group = collection.group("G").unwrap().unwrap();

    assert_eq!(
        changes.borrow().as_slice(),
        &[
            CollectionChange::Removed {
                container: None,
                entity: ids[1],
                index: 1
            },
            CollectionChange::Removed {
                container: None,
                entity: ids[2],
                index: 1
            },
            CollectionChange::Inserted {
                container: None,
                entity: group,
                index: 1
            },
        ]
    );
    common::assert_tree_consistent(&collection);
}

#[test]
fn reorder_reports_each_step() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A", "B"]);
    collection.set_selection([ids[1]]).unwrap();
    let changes = recorded(&mut collection);

    collection.move_up().unwrap();

    assert_eq!(
        changes.borrow().as_slice(),
        &[CollectionChange::Moved {
            container: None,
            entity: ids[1],
            from: 1,
            to: 0
        }]
    );
    common::assert_tree_consistent(&collection);
}

#[test]
fn clear_rename_and_unsubscribe() {
    let mut collection = DisplayCollection::new();
    let ids = placed_items(&mut collection, &["A"]);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let subscription = collection.subscribe(move |change| sink.borrow_mut().push(*change));

    collection.rename(ids[0], "renamed").unwrap();
    collection.clear();
    assert!(collection.unsubscribe(subscription));
    let item = collection.create_item("late");
    collection.add(item).unwrap();

    assert_eq!(
        changes.borrow().as_slice(),
        &[
            CollectionChange::Renamed { entity: ids[0] },
            CollectionChange::Reset,
        ]
    );
    common::assert_tree_consistent(&collection);
}
