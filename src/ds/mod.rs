pub mod future_index;
pub mod lazy_heap;
pub mod slot_arena;

pub use future_index::{FutureIndex, NextUse};
pub use lazy_heap::LazyMinHeap;
pub use slot_arena::{SlotArena, SlotId};
