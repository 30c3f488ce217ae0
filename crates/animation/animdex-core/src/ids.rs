//! Identifiers and a simple allocator for mixer actions.

use serde::{Deserialize, Serialize};

/// Handle to one action owned by a [`Mixer`](crate::mixer::Mixer).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u32);

/// Monotonic allocator for ActionId.
/// Dense indices keep the mixer's action table compact; IDs are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_action: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_action(&mut self) -> ActionId {
        let id = ActionId(self.next_action);
        self.next_action = self.next_action.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
