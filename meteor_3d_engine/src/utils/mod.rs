/// Utility module - shared helpers with no engine dependencies

pub mod angles;
pub mod frame_timer;
pub mod slot_allocator;

pub use angles::*;
pub use frame_timer::FrameTimer;
pub use slot_allocator::SlotAllocator;
