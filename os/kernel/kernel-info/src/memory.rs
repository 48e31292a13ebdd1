//! # Memory Layout

use kernel_memory_addresses::{FrameIndex, PageSize, PhysicalAddress, Size4K, VirtualAddress};

/// Size of a physical frame in bytes.
pub const FRAME_SIZE: u64 = Size4K::SIZE;

/// Physical memory is direct-mapped at [`DIRECT_MAP_BASE`] + `pa`, so a kernel
/// virtual address `va` in that window sits at physical `va - DIRECT_MAP_BASE`.
pub const DIRECT_MAP_BASE: u64 = 0xffff_8880_0000_0000;

/// Where the kernel image is placed in *physical* memory (1 MiB).
pub const PHYS_LOAD: u64 = 0x0010_0000;

/// Top of usable physical memory. Frames at or above this address are never
/// handed to the frame allocator.
pub const PHYS_TOP: u64 = 0x0E00_0000; // 224 MiB

/// Slots in the per-frame reference count table; covers `[0, PHYS_TOP)`.
pub const TRACKED_FRAMES: usize = FrameIndex::count_below(PhysicalAddress::new(PHYS_TOP));

/// Physical memory the kernel can map during phase-one initialization, before
/// the full direct map is installed (4 MiB past the image load address).
pub const EARLY_MAP_TOP: u64 = 0x0040_0000;

/// Virtual address of `pa` in the direct map.
#[inline]
#[must_use]
pub const fn direct_map(pa: PhysicalAddress) -> VirtualAddress {
    VirtualAddress::new(DIRECT_MAP_BASE + pa.as_u64())
}

const _: () = {
    assert!(PHYS_TOP.is_multiple_of(FRAME_SIZE));
    assert!(PHYS_LOAD.is_multiple_of(FRAME_SIZE));
    assert!(PHYS_LOAD < EARLY_MAP_TOP);
    assert!(EARLY_MAP_TOP <= PHYS_TOP);
    assert!(TRACKED_FRAMES == 0xE000);
};
