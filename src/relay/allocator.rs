//! Slot Allocator
//!
//! Picks the slot of a target container that should receive one more unit
//! of an item. Pure: reads the container, never writes it, keeps no state.
//!
//! # Policy (slots scanned `0..size`)
//!
//! 1. A non-full matching stack seen before any empty slot wins immediately.
//! 2. An empty slot seen before any match is remembered; the first match
//!    found after it (full or not) returns that empty slot.
//! 3. An empty slot found after a full match is returned.
//! 4. A scan that only found full matches returns nothing.
//! 5. A scan that only found empty slots returns the first one under
//!    [`AllocationPolicy::AllowNewStacks`], nothing under
//!    [`AllocationPolicy::ConsolidateOnly`].

use serde::{Deserialize, Serialize};

use crate::core_types::ItemId;
use crate::world::{Container, ItemStack};

/// What to do with a container that holds no stack of the item at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Only containers already holding the item accept it
    #[default]
    ConsolidateOnly,
    /// Any container with an empty slot accepts it
    AllowNewStacks,
}

/// Slot that should receive one unit of `item`, if the container can take it.
pub fn find_target_slot(
    item: ItemId,
    container: &dyn Container,
    policy: AllocationPolicy,
) -> Option<usize> {
    let mut first_empty: Option<usize> = None;
    let mut seen_full_match = false;

    for slot in 0..container.size() {
        let stack = container.stack(slot);
        if stack.is_empty() {
            if seen_full_match {
                return Some(slot);
            }
            first_empty.get_or_insert(slot);
        } else if stack.is_of(item) {
            if first_empty.is_some() {
                return first_empty;
            }
            if !is_full(container, stack) {
                return Some(slot);
            }
            seen_full_match = true;
        }
    }

    match policy {
        AllocationPolicy::AllowNewStacks => first_empty,
        AllocationPolicy::ConsolidateOnly => None,
    }
}

/// True when `container` can currently take at least one unit of `item`
#[inline]
pub fn accepts(item: ItemId, container: &dyn Container, policy: AllocationPolicy) -> bool {
    find_target_slot(item, container, policy).is_some()
}

#[inline]
fn is_full(container: &dyn Container, stack: ItemStack) -> bool {
    stack.count >= container.max_stack_size(stack.item)
}
