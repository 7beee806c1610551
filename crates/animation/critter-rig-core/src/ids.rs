//! Identifiers for skeleton nodes and registered clips.

use serde::{Deserialize, Serialize};

/// Dense index of a node inside its skeleton arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub u32);

/// Monotonic allocator for ClipId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_clip: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_clip(&mut self) -> ClipId {
        let id = ClipId(self.next_clip);
        self.next_clip = self.next_clip.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
