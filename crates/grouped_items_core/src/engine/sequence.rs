//! Ordered-sequence algorithms shared by the top level and group child lists.
//!
//! # Invariants
//! - Moves only ever swap one entity with its direct neighbour.
//! - A batch move stops at the first entity already at the boundary; the
//!   remaining entities of that batch are left untouched.
//! - Selected ids absent from the sequence are ignored.

use crate::model::entity::EntityId;

/// One performed reorder step inside a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveStep {
    pub entity: EntityId,
    pub from: usize,
    pub to: usize,
}

/// Position of `id` in `sequence`.
pub fn position(sequence: &[EntityId], id: &EntityId) -> Option<usize> {
    sequence.iter().position(|candidate| candidate == id)
}

/// Lowest index among selected ids present in `sequence`, or `0` when none is.
pub fn lowest_index_among(sequence: &[EntityId], selection: &[EntityId]) -> usize {
    selection
        .iter()
        .filter_map(|id| position(sequence, id))
        .min()
        .unwrap_or(0)
}

/// Moves every selected entity one slot toward the front.
pub fn move_up(sequence: &mut Vec<EntityId>, selected: &[EntityId]) -> Vec<MoveStep> {
    let mut pending = present_in(sequence, selected);
    pending.sort_by_key(|id| position(sequence, id));

    let mut steps = Vec::new();
    for id in pending {
        let Some(index) = position(sequence, &id) else {
            continue;
        };
        if index == 0 {
            break;
        }
        sequence.remove(index);
        sequence.insert(index - 1, id);
        steps.push(MoveStep {
            entity: id,
            from: index,
            to: index - 1,
        });
    }
    steps
}

/// Moves every selected entity one slot toward the back.
pub fn move_down(sequence: &mut Vec<EntityId>, selected: &[EntityId]) -> Vec<MoveStep> {
    let mut pending = present_in(sequence, selected);
    pending.sort_by_key(|id| std::cmp::Reverse(position(sequence, id)));

    let mut steps = Vec::new();
    for id in pending {
        let Some(index) = position(sequence, &id) else {
            continue;
        };
        if index + 1 >= sequence.len() {
            break;
        }
        sequence.remove(index);
        sequence.insert(index + 1, id);
        steps.push(MoveStep {
            entity: id,
            from: index,
            to: index + 1,
        });
    }
    steps
}

fn present_in(sequence: &[EntityId], selected: &[EntityId]) -> Vec<EntityId> {
    let mut result: Vec<EntityId> = Vec::with_capacity(selected.len());
    for id in selected {
        if sequence.contains(id) && !result.contains(id) {
            result.push(*id);
        }
    }
    result
}
