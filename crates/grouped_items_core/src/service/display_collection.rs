//! Selection-driven command surface over a display collection.
//!
//! # Responsibility
//! - Own the top-level sequence, the selection and the clipboard.
//! - Translate commands into `EntityStore` mutations and change events.
//!
//! # Invariants
//! - Top-level entities have no parent; every contained entity is reachable
//!   from exactly one top-level entity.
//! - The selection only holds ids placed in the collection.
//! - Clipboard entries are detached deep copies and are never placed.
//! - Ill-formed selections turn commands into no-ops. Errors only report
//!   bad ids passed by the caller or a broken store invariant.

use crate::config::{CollectionConfig, ConfigError};
use crate::engine::grouping::{clone_selection, GroupingEngine};
use crate::engine::sequence::{self, MoveStep};
use crate::model::entity::{EntityId, EntitySnapshot};
use crate::model::level::Level;
use crate::model::selection::Selection;
use crate::model::store::{EntityStore, StoreError};
use crate::service::events::{ChangeNotifier, CollectionChange, SubscriptionId};
use crate::service::naming::{NameGenerator, SequentialNameGenerator};
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by display collection commands.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Errors from display collection commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Id is not known to the collection's store.
    UnknownEntity(EntityId),
    /// Entity is already placed (or buffered) and cannot be added again.
    AlreadyPlaced(EntityId),
    /// Operation needs a group but got an item.
    NotAGroup(EntityId),
    /// Store-level invariant violation.
    Store(StoreError),
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEntity(id) => write!(f, "unknown display entity: {id}"),
            Self::AlreadyPlaced(id) => write!(f, "display entity is already placed: {id}"),
            Self::NotAGroup(id) => write!(f, "display entity is not a group: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CollectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CollectionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Question put to the ambiguity resolver before a batch add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguityContext {
    /// The single selected container.
    pub container: EntityId,
    pub container_name: String,
    /// The container has no children yet.
    pub childless: bool,
    /// Every top-level entity is a container.
    pub all_top_level_containers: bool,
}

type AmbiguityResolver = Box<dyn FnMut(&AmbiguityContext) -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    TopLevel,
    Group(EntityId),
    Unresolved,
}

/// Mutable, orderable collection of items and nested groups.
pub struct DisplayCollection {
    store: EntityStore,
    top_level: Vec<EntityId>,
    selection: Selection,
    clipboard: Vec<EntityId>,
    add_inside_selected: bool,
    ambiguity_resolver: Option<AmbiguityResolver>,
    group_names: Box<dyn NameGenerator>,
    item_names: Box<dyn NameGenerator>,
    notifier: ChangeNotifier,
}

impl Default for DisplayCollection {
    fn default() -> Self {
        Self::build(&CollectionConfig::default())
    }
}

impl std::fmt::Debug for DisplayCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayCollection")
            .field("top_level", &self.top_level)
            .field("selection", &self.selection)
            .field("clipboard", &self.clipboard)
            .field("entities", &self.store.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl DisplayCollection {
    /// Creates an empty collection with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection with validated configuration.
    pub fn with_config(config: CollectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(&config))
    }

    fn build(config: &CollectionConfig) -> Self {
        Self {
            store: EntityStore::new(),
            top_level: Vec::new(),
            selection: Selection::new(),
            clipboard: Vec::new(),
            add_inside_selected: false,
            ambiguity_resolver: None,
            group_names: Box::new(SequentialNameGenerator::new(
                config.group_name_prefix.as_str(),
            )),
            item_names: Box::new(SequentialNameGenerator::new(
                config.item_name_prefix.as_str(),
            )),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Read-only selection queries bound to this collection's store.
    pub fn engine(&self) -> GroupingEngine<'_> {
        GroupingEngine::new(&self.store)
    }

    /// Top-level entities in display order.
    pub fn top_level(&self) -> &[EntityId] {
        &self.top_level
    }

    /// Number of top-level entities.
    pub fn len(&self) -> usize {
        self.top_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }

    /// Detached copies currently buffered by `cut` / `copy`.
    pub fn clipboard(&self) -> &[EntityId] {
        &self.clipboard
    }

    pub fn level(&self, id: EntityId) -> Option<Level> {
        self.store.level(id)
    }

    /// Whether `id` is placed somewhere in the collection.
    pub fn contains(&self, id: EntityId) -> bool {
        let mut visited = HashSet::new();
        let mut current = id;
        loop {
            if !self.store.contains(current) || !visited.insert(current) {
                return false;
            }
            match self.store.parent(current) {
                Some(parent) => current = parent,
                None => return self.top_level.contains(&current),
            }
        }
    }

    /// Creates a detached item; place it with `add`, `insert` or friends.
    pub fn create_item(&mut self, name: impl Into<String>) -> EntityId {
        self.store.create_item(name)
    }

    /// Creates a detached, empty group.
    pub fn create_group(&mut self, name: impl Into<String>) -> EntityId {
        self.store.create_group(name)
    }

    pub fn set_group_name_generator(&mut self, generator: impl NameGenerator + 'static) {
        self.group_names = Box::new(generator);
    }

    pub fn set_item_name_generator(&mut self, generator: impl NameGenerator + 'static) {
        self.item_names = Box::new(generator);
    }

    /// Installs the decision asked before an ambiguous batch add.
    ///
    /// `true` means "add inside the selected container".
    pub fn set_ambiguity_resolver(
        &mut self,
        resolver: impl FnMut(&AmbiguityContext) -> bool + 'static,
    ) {
        self.ambiguity_resolver = Some(Box::new(resolver));
    }

    pub fn clear_ambiguity_resolver(&mut self) {
        self.ambiguity_resolver = None;
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&CollectionChange) + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces the selection.
    ///
    /// # Errors
    /// - `UnknownEntity` when any id is not placed; the selection is left
    ///   unchanged.
    pub fn set_selection(
        &mut self,
        ids: impl IntoIterator<Item = EntityId>,
    ) -> CollectionResult<()> {
        let ids = ids.into_iter().collect::<Vec<_>>();
        if let Some(unknown) = ids.iter().find(|id| !self.contains(**id)) {
            return Err(CollectionError::UnknownEntity(*unknown));
        }
        self.selection.replace(ids);
        Ok(())
    }

    /// Adds one placed entity to the selection.
    pub fn select(&mut self, id: EntityId) -> CollectionResult<bool> {
        if !self.contains(id) {
            return Err(CollectionError::UnknownEntity(id));
        }
        Ok(self.selection.insert(id))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Non-empty selection made only of contained entities.
    pub fn only_children_selected(&self) -> bool {
        let engine = self.engine();
        !self.selection.is_empty() && self.selection.iter().all(|id| engine.is_contained(*id))
    }

    /// Whether the distinct selection shares one owning group.
    pub fn belong_to_same_group(&self) -> bool {
        self.engine().belong_to_same_group(&self.selected())
    }

    /// Places a detached entity according to the selection.
    ///
    /// Returns `false` when the selection gives no destination; the entity
    /// then stays detached.
    pub fn add(&mut self, id: EntityId) -> CollectionResult<bool> {
        self.ensure_detached(id)?;
        match self.resolve_destination() {
            Destination::TopLevel => {
                self.push_top_level(id);
                Ok(true)
            }
            Destination::Group(group) => {
                self.store.add(group, id)?;
                let index = self.store.children(group).len().saturating_sub(1);
                self.notify(CollectionChange::Inserted {
                    container: Some(group),
                    entity: id,
                    index,
                });
                Ok(true)
            }
            Destination::Unresolved => {
                debug!("event=collection_add module=collection status=skipped reason=unresolved_destination");
                Ok(false)
            }
        }
    }

    /// Adds several detached entities, asking the ambiguity resolver once.
    ///
    /// Returns how many were placed.
    pub fn add_items(&mut self, ids: &[EntityId]) -> CollectionResult<usize> {
        let mut unique = HashSet::new();
        for id in ids {
            self.ensure_detached(*id)?;
            if !unique.insert(*id) {
                return Err(CollectionError::AlreadyPlaced(*id));
            }
        }

        self.add_inside_selected = self.ask_ambiguity();
        let result = ids
            .iter()
            .try_fold(0usize, |placed, id| -> CollectionResult<usize> {
                Ok(placed + usize::from(self.add(*id)?))
            });
        self.add_inside_selected = false;
        result
    }

    /// Like `add`, but lands at the lowest selected index of the destination.
    pub fn insert(&mut self, id: EntityId) -> CollectionResult<bool> {
        self.ensure_detached(id)?;
        let selected = self.selected();
        match self.resolve_destination() {
            Destination::TopLevel => {
                let index = sequence::lowest_index_among(&self.top_level, &selected);
                self.top_level.insert(index, id);
                self.notify(CollectionChange::Inserted {
                    container: None,
                    entity: id,
                    index,
                });
                Ok(true)
            }
            Destination::Group(group) => {
                let index = self.store.insert(group, id, &selected)?;
                self.notify(CollectionChange::Inserted {
                    container: Some(group),
                    entity: id,
                    index,
                });
                Ok(true)
            }
            Destination::Unresolved => {
                debug!("event=collection_insert module=collection status=skipped reason=unresolved_destination");
                Ok(false)
            }
        }
    }

    /// Appends a detached entity at the top level, ignoring the selection.
    pub fn add_as_ungrouped(&mut self, id: EntityId) -> CollectionResult<()> {
        self.ensure_detached(id)?;
        self.push_top_level(id);
        Ok(())
    }

    /// Appends a detached entity to `group`, placed or not.
    ///
    /// Used to assemble nested structures before placing them. Groups held
    /// by the clipboard are rejected with `AlreadyPlaced`.
    pub fn add_to_group(&mut self, group: EntityId, child: EntityId) -> CollectionResult<()> {
        let entity = self
            .store
            .get(group)
            .ok_or(CollectionError::UnknownEntity(group))?;
        if !entity.is_group() {
            return Err(CollectionError::NotAGroup(group));
        }
        if self.is_buffered(group) {
            return Err(CollectionError::AlreadyPlaced(group));
        }
        self.ensure_detached(child)?;
        self.store.add(group, child)?;
        if self.contains(group) {
            let index = self.store.children(group).len().saturating_sub(1);
            self.notify(CollectionChange::Inserted {
                container: Some(group),
                entity: child,
                index,
            });
        }
        Ok(())
    }

    /// Creates an item named by the item name generator and `add`s it.
    pub fn add_new_item(&mut self) -> CollectionResult<Option<EntityId>> {
        let name = self.item_names.next_name();
        let id = self.store.create_item(name);
        if self.add(id)? {
            Ok(Some(id))
        } else {
            self.store.purge(id);
            Ok(None)
        }
    }

    /// Buffers copies of the selection and removes it from the collection.
    ///
    /// Returns how many distinct entities were removed.
    pub fn cut(&mut self) -> CollectionResult<usize> {
        let selected = self.selected();
        let clones = clone_selection(&mut self.store, &selected)?;
        self.replace_clipboard(clones);

        let distinct = self.engine().distinct(&selected);
        for id in &distinct {
            self.discard(*id)?;
        }
        self.prune_selection();
        debug!(
            "event=collection_cut module=collection status=ok removed={} buffered={}",
            distinct.len(),
            self.clipboard.len()
        );
        Ok(distinct.len())
    }

    /// Buffers copies of the selection. Returns the buffered count.
    pub fn copy(&mut self) -> CollectionResult<usize> {
        let selected = self.selected();
        let clones = clone_selection(&mut self.store, &selected)?;
        self.replace_clipboard(clones);
        Ok(self.clipboard.len())
    }

    /// `add`s a fresh copy of every buffered entity. Returns how many landed.
    pub fn paste(&mut self) -> CollectionResult<usize> {
        let buffered = self.clipboard.clone();
        self.add_copies(&buffered)
    }

    /// `add`s a fresh copy of every selected entity. Returns how many landed.
    pub fn duplicate(&mut self) -> CollectionResult<usize> {
        let selected = self.selected();
        self.add_copies(&selected)
    }

    /// Removes the selection (and everything inside it) from the collection.
    pub fn delete(&mut self) -> CollectionResult<usize> {
        let distinct = self.engine().distinct(&self.selected());
        for id in &distinct {
            self.discard(*id)?;
        }
        self.prune_selection();
        debug!(
            "event=collection_delete module=collection status=ok removed={}",
            distinct.len()
        );
        Ok(distinct.len())
    }

    /// Drops every entity, including created but never placed ones. The
    /// clipboard is kept.
    pub fn clear(&mut self) {
        self.drop_all_but_clipboard();
        self.notify(CollectionChange::Reset);
    }

    /// Wraps the selection into a new group named `name`.
    ///
    /// Returns `None`, creating nothing, when the selection does not share
    /// one owning group.
    pub fn group(&mut self, name: impl Into<String>) -> CollectionResult<Option<EntityId>> {
        if !self.belong_to_same_group() {
            debug!("event=collection_group module=collection status=skipped reason=mixed_owners");
            return Ok(None);
        }
        let group = self.store.create_group(name);
        if self.move_to(group)? {
            Ok(Some(group))
        } else {
            self.store.purge(group);
            Ok(None)
        }
    }

    /// `group` with the next name of the group name generator.
    pub fn group_with_generated_name(&mut self) -> CollectionResult<Option<EntityId>> {
        let name = self.group_names.next_name();
        self.group(name)
    }

    /// Moves the distinct selection into the detached `group` and places the
    /// group where the selection started. The selection becomes `{group}`.
    ///
    /// Returns `false` when the selection does not share one owning group.
    ///
    /// # Errors
    /// - `UnknownEntity` / `NotAGroup` / `AlreadyPlaced` for a bad `group`.
    pub fn move_to(&mut self, group: EntityId) -> CollectionResult<bool> {
        let entity = self
            .store
            .get(group)
            .ok_or(CollectionError::UnknownEntity(group))?;
        if !entity.is_group() {
            return Err(CollectionError::NotAGroup(group));
        }
        self.ensure_detached(group)?;

        let selected = self.selected();
        let engine = self.engine();
        if !engine.belong_to_same_group(&selected) {
            debug!("event=collection_move_to module=collection status=skipped reason=mixed_owners");
            return Ok(false);
        }
        let distinct = engine.distinct(&selected);
        let owner = distinct.first().and_then(|id| engine.owner_of(*id));
        let index = match owner {
            None => sequence::lowest_index_among(&self.top_level, &selected),
            Some(owner) => sequence::lowest_index_among(self.store.children(owner), &selected),
        };

        for id in &distinct {
            self.detach_from_container(*id)?;
            self.store.add(group, *id)?;
        }
        let inserted_at = match owner {
            None => {
                let at = index.min(self.top_level.len());
                self.top_level.insert(at, group);
                at
            }
            Some(owner) => self.store.insert_at(owner, index, group)?,
        };
        self.notify(CollectionChange::Inserted {
            container: owner,
            entity: group,
            index: inserted_at,
        });
        self.selection.replace([group]);
        debug!(
            "event=collection_move_to module=collection status=ok group={} moved={} index={}",
            group,
            distinct.len(),
            inserted_at
        );
        Ok(true)
    }

    /// Dissolves every highest selected container: its children rise one
    /// level to where it stood, then the emptied container is dropped.
    ///
    /// Returns how many containers were dissolved.
    pub fn un_group(&mut self) -> CollectionResult<usize> {
        let containers = self
            .engine()
            .highest_selected_containers(&self.selected());
        for container in &containers {
            let children = self.store.children(*container).to_vec();
            for child in children {
                self.promote(child)?;
            }
            self.discard(*container)?;
        }
        self.prune_selection();
        debug!(
            "event=collection_un_group module=collection status=ok dissolved={}",
            containers.len()
        );
        Ok(containers.len())
    }

    /// Lifts every movable selected entity one level up, right before its
    /// former container. Returns how many moved.
    pub fn move_items_out_of_group(&mut self) -> CollectionResult<usize> {
        let movable = self.engine().movable(&self.selected());
        let mut moved = 0;
        for id in movable {
            if self.promote(id)? {
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Moves the selection one slot toward the front of its sequence.
    ///
    /// Returns the number of performed steps.
    pub fn move_up(&mut self) -> CollectionResult<usize> {
        self.reorder(true)
    }

    /// Moves the selection one slot toward the back of its sequence.
    pub fn move_down(&mut self) -> CollectionResult<usize> {
        self.reorder(false)
    }

    pub fn rename(&mut self, id: EntityId, name: impl Into<String>) -> CollectionResult<()> {
        if !self.store.contains(id) {
            return Err(CollectionError::UnknownEntity(id));
        }
        self.store.rename(id, name)?;
        self.notify(CollectionChange::Renamed { entity: id });
        Ok(())
    }

    /// Replaces the whole collection with `snapshots`, top level first.
    ///
    /// Entities created but never placed are dropped like placed ones. Name
    /// generators observe every loaded name.
    pub fn load(&mut self, snapshots: &[EntitySnapshot]) -> CollectionResult<()> {
        self.drop_all_but_clipboard();

        for snapshot in snapshots {
            let id = self.store.materialize(snapshot)?;
            self.top_level.push(id);
            self.observe_names(snapshot);
        }
        self.notify(CollectionChange::Reset);
        info!(
            "event=collection_load module=collection status=ok top_level={} entities={}",
            self.top_level.len(),
            snapshots
                .iter()
                .map(EntitySnapshot::subtree_len)
                .sum::<usize>()
        );
        Ok(())
    }

    /// Value tree of the collection, top level first.
    pub fn snapshot(&self) -> CollectionResult<Vec<EntitySnapshot>> {
        self.top_level
            .iter()
            .map(|id| self.store.snapshot(*id).map_err(Into::into))
            .collect()
    }

    fn selected(&self) -> Vec<EntityId> {
        self.selection.to_vec()
    }

    fn notify(&mut self, change: CollectionChange) {
        self.notifier.notify(&change);
    }

    fn ensure_detached(&self, id: EntityId) -> CollectionResult<()> {
        let entity = self
            .store
            .get(id)
            .ok_or(CollectionError::UnknownEntity(id))?;
        if entity.parent().is_some() || self.top_level.contains(&id) || self.clipboard.contains(&id)
        {
            return Err(CollectionError::AlreadyPlaced(id));
        }
        Ok(())
    }

    /// Whether `id` sits in a clipboard tree.
    fn is_buffered(&self, id: EntityId) -> bool {
        let mut root = id;
        while let Some(parent) = self.store.parent(root) {
            root = parent;
        }
        self.clipboard.contains(&root)
    }

    fn resolve_destination(&self) -> Destination {
        let selected = self.selected();
        let Some(first) = selected.first().copied() else {
            return Destination::TopLevel;
        };
        let engine = self.engine();
        if self.add_inside_selected && selected.len() == 1 && engine.is_container(first) {
            return Destination::Group(first);
        }
        if engine.any_top_level(&selected) {
            return Destination::TopLevel;
        }
        if engine.belong_to_same_group(&selected) {
            return match engine
                .distinct(&selected)
                .first()
                .and_then(|id| engine.owner_of(*id))
            {
                Some(group) => Destination::Group(group),
                None => Destination::TopLevel,
            };
        }
        Destination::Unresolved
    }

    fn ambiguity_context(&self) -> Option<AmbiguityContext> {
        if self.selection.len() != 1 {
            return None;
        }
        let container = self.selection.first()?;
        let engine = self.engine();
        if !engine.is_container(container) {
            return None;
        }
        let childless = engine.is_childless_container(container);
        let all_top_level_containers = engine.all_containers(&self.top_level);
        if !childless && !all_top_level_containers {
            return None;
        }
        Some(AmbiguityContext {
            container,
            container_name: self.store.name(container).unwrap_or_default().to_string(),
            childless,
            all_top_level_containers,
        })
    }

    fn ask_ambiguity(&mut self) -> bool {
        let Some(context) = self.ambiguity_context() else {
            return false;
        };
        let Some(resolver) = self.ambiguity_resolver.as_mut() else {
            return false;
        };
        let inside = resolver(&context);
        debug!(
            "event=collection_ambiguity module=collection status=ok container={} inside={}",
            context.container, inside
        );
        inside
    }

    fn push_top_level(&mut self, id: EntityId) {
        let index = self.top_level.len();
        self.top_level.push(id);
        self.notify(CollectionChange::Inserted {
            container: None,
            entity: id,
            index,
        });
    }

    fn add_copies(&mut self, sources: &[EntityId]) -> CollectionResult<usize> {
        let mut placed = 0;
        for source in sources {
            let copy = self.store.copy(*source)?;
            if self.add(copy)? {
                placed += 1;
            } else {
                self.store.purge(copy);
            }
        }
        Ok(placed)
    }

    fn drop_all_but_clipboard(&mut self) {
        self.top_level.clear();
        self.selection.clear();
        for id in self.store.detached() {
            if !self.clipboard.contains(&id) {
                self.store.purge(id);
            }
        }
    }

    fn replace_clipboard(&mut self, clones: Vec<EntityId>) {
        for stale in std::mem::replace(&mut self.clipboard, clones) {
            self.store.purge(stale);
        }
    }

    /// Takes `id` out of its group or the top level, emitting `Removed`.
    fn detach_from_container(&mut self, id: EntityId) -> CollectionResult<()> {
        if let Some((container, index)) = self.store.detach(id)? {
            self.notify(CollectionChange::Removed {
                container: Some(container),
                entity: id,
                index,
            });
        } else if let Some(index) = sequence::position(&self.top_level, &id) {
            self.top_level.remove(index);
            self.notify(CollectionChange::Removed {
                container: None,
                entity: id,
                index,
            });
        }
        Ok(())
    }

    fn discard(&mut self, id: EntityId) -> CollectionResult<()> {
        self.detach_from_container(id)?;
        self.store.purge(id);
        Ok(())
    }

    fn prune_selection(&mut self) {
        let store = &self.store;
        self.selection.retain(|id| store.contains(*id));
    }

    /// Moves a contained entity one level up, right before its container.
    fn promote(&mut self, id: EntityId) -> CollectionResult<bool> {
        let Some(parent) = self.store.parent(id) else {
            return Ok(false);
        };
        match self.store.parent(parent) {
            None => {
                let Some(parent_index) = sequence::position(&self.top_level, &parent) else {
                    warn!(
                        "event=collection_promote module=collection status=error reason=container_not_placed container={}",
                        parent
                    );
                    return Ok(false);
                };
                if let Some(removed_at) = self.store.remove(parent, id)? {
                    self.notify(CollectionChange::Removed {
                        container: Some(parent),
                        entity: id,
                        index: removed_at,
                    });
                }
                self.top_level.insert(parent_index, id);
                self.notify(CollectionChange::Inserted {
                    container: None,
                    entity: id,
                    index: parent_index,
                });
            }
            Some(grandparent) => {
                let (former, removed_at, inserted_at) =
                    self.store.insert_at_parent_index(grandparent, id)?;
                self.notify(CollectionChange::Removed {
                    container: Some(former),
                    entity: id,
                    index: removed_at,
                });
                self.notify(CollectionChange::Inserted {
                    container: Some(grandparent),
                    entity: id,
                    index: inserted_at,
                });
            }
        }
        Ok(true)
    }

    fn reorder(&mut self, up: bool) -> CollectionResult<usize> {
        let selected = self.selected();
        let engine = self.engine();
        let (contained, rest): (Vec<EntityId>, Vec<EntityId>) = selected
            .iter()
            .copied()
            .partition(|id| engine.is_contained(*id));
        let mut by_owner: IndexMap<EntityId, Vec<EntityId>> = IndexMap::new();
        for id in contained {
            if let Some(owner) = engine.owner_of(id) {
                by_owner.entry(owner).or_default().push(id);
            }
        }

        let steps = if up {
            sequence::move_up(&mut self.top_level, &rest)
        } else {
            sequence::move_down(&mut self.top_level, &rest)
        };
        let mut performed = self.notify_moves(None, &steps);

        for (owner, ids) in by_owner {
            let steps = if up {
                self.store.move_children_up(owner, &ids)?
            } else {
                self.store.move_children_down(owner, &ids)?
            };
            performed += self.notify_moves(Some(owner), &steps);
        }
        Ok(performed)
    }

    fn notify_moves(&mut self, container: Option<EntityId>, steps: &[MoveStep]) -> usize {
        for step in steps {
            self.notify(CollectionChange::Moved {
                container,
                entity: step.entity,
                from: step.from,
                to: step.to,
            });
        }
        steps.len()
    }

    fn observe_names(&mut self, snapshot: &EntitySnapshot) {
        if snapshot.is_group() {
            self.group_names.observe(&snapshot.name);
        } else {
            self.item_names.observe(&snapshot.name);
        }
        for child in &snapshot.children {
            self.observe_names(child);
        }
    }
}
