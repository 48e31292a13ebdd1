//! # The kernel's frame allocator
//!
//! The kernel keeps exactly one [`FrameAllocator`], installed once after phase
//! two and never torn down.
//!
//! ```rust,no_run
//! use kernel_info::memory::{direct_map, EARLY_MAP_TOP, PHYS_TOP, TRACKED_FRAMES};
//! use kernel_memory_addresses::{PhysicalAddress, VirtualAddress};
//! use kernel_pmm::{global, init_phase_one, HhdmPhysMapper, MemoryLayout};
//!
//! static mut REFCOUNTS: [u32; TRACKED_FRAMES] = [0; TRACKED_FRAMES];
//!
//! # fn kernel_end() -> VirtualAddress { direct_map(PhysicalAddress::new(0x20_0000)) }
//! let end = kernel_end();
//! let early_top = direct_map(PhysicalAddress::new(EARLY_MAP_TOP));
//! let counts = unsafe { &mut *(&raw mut REFCOUNTS) };
//!
//! let boot = unsafe {
//!     init_phase_one(MemoryLayout::kernel(end), HhdmPhysMapper::kernel(), counts, end..early_top)
//! }
//! .unwrap_or_else(|e| panic!("kmem: {e}"));
//!
//! // ... install the full direct map, bring up the other cores ...
//!
//! let kmem = unsafe { boot.init_phase_two(early_top..direct_map(PhysicalAddress::new(PHYS_TOP))) };
//! global::install(kmem).unwrap_or_else(|e| panic!("{e}"));
//!
//! let frame = global::kmem().and_then(|k| k.allocate());
//! ```

use crate::allocator::FrameAllocator;
use crate::error::InstallError;
use crate::phys_mapper::HhdmPhysMapper;
use kernel_sync::SyncOnceCell;
use log::debug;

/// The allocator as the kernel uses it: static count table, direct map.
pub type KernelFrameAllocator = FrameAllocator<'static, HhdmPhysMapper>;

static KMEM: SyncOnceCell<KernelFrameAllocator> = SyncOnceCell::new();

/// Makes `alloc` the kernel's frame allocator.
///
/// # Errors
/// [`InstallError`] if one is installed already; `alloc` is dropped.
pub fn install(alloc: KernelFrameAllocator) -> Result<&'static KernelFrameAllocator, InstallError> {
    let installed = KMEM.set(alloc).map_err(|_| InstallError)?;
    let info = installed.info();
    debug!(
        "kmem: installed global frame allocator, {} free frame(s)",
        info.free_frames
    );
    Ok(installed)
}

/// The installed allocator, if any.
#[inline]
pub fn kmem() -> Option<&'static KernelFrameAllocator> {
    KMEM.get()
}
