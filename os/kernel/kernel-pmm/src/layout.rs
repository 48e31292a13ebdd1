//! # Managed memory bounds

use kernel_info::memory::PHYS_TOP;
use kernel_memory_addresses::{FrameIndex, PhysicalAddress, VirtualAddress};

/// The window of memory the allocator may manage.
///
/// A frame is valid iff its virtual address is at or above `kernel_end`
/// and its physical address is below `phys_top`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryLayout {
    /// First address after the kernel image.
    pub kernel_end: VirtualAddress,
    /// Exclusive upper bound of usable physical memory.
    pub phys_top: PhysicalAddress,
}

impl MemoryLayout {
    #[must_use]
    pub const fn new(kernel_end: VirtualAddress, phys_top: PhysicalAddress) -> Self {
        Self {
            kernel_end,
            phys_top,
        }
    }

    /// The kernel's own layout: everything after `kernel_end` up to
    /// [`PHYS_TOP`](kernel_info::memory::PHYS_TOP).
    #[must_use]
    pub const fn kernel(kernel_end: VirtualAddress) -> Self {
        Self::new(kernel_end, PhysicalAddress::new(PHYS_TOP))
    }

    /// Number of reference count slots needed to cover `[0, phys_top)`.
    #[must_use]
    pub const fn tracked_frames(&self) -> usize {
        FrameIndex::count_below(self.phys_top)
    }
}
