//! # Phase one: unsynchronized bootstrap
//!
//! Early boot runs on a single core with interrupts off, long before the
//! kernel can rely on its locks. [`init_phase_one`] builds the allocator in that
//! world: the returned [`BootFrameAllocator`] is used through `&mut`, so the
//! compiler rather than a lock guarantees there is exactly one user.
//!
//! [`BootFrameAllocator::init_phase_two`] is the only way out. It seeds the
//! rest of memory and then wraps the state in a lock, yielding the shared
//! [`FrameAllocator`].

use crate::allocator::FrameAllocator;
use crate::error::{FreeError, LayoutError};
use crate::frame_table::{FrameTable, MemoryInfo};
use crate::layout::MemoryLayout;
use crate::phys_mapper::PhysMapper;
use core::ops::Range;
use kernel_memory_addresses::VirtualAddress;
use log::info;

/// The frame allocator before locking is available.
pub struct BootFrameAllocator<'a, M> {
    table: FrameTable<'a, M>,
}

/// Sets up the allocator with locking disabled and seeds it from `range`.
///
/// `counts` backs the reference count table. It must cover every frame below
/// `layout.phys_top` and is zeroed here.
///
/// # Errors
/// [`LayoutError`] if `counts` is too small or the layout is degenerate.
///
/// # Panics
/// If `range` contains a frame outside the managed bounds (see
/// [`FrameAllocator::free`]).
///
/// # Safety
/// Every complete frame in `range` must be unused memory, mapped writable at
/// that address, that the allocator takes over for good.
pub unsafe fn init_phase_one<M: PhysMapper>(
    layout: MemoryLayout,
    mapper: M,
    counts: &mut [u32],
    range: Range<VirtualAddress>,
) -> Result<BootFrameAllocator<'_, M>, LayoutError> {
    let mut table = FrameTable::new(layout, mapper, counts)?;
    let seeded = unsafe { seed_or_die(&mut table, range.clone()) };
    info!(
        "kmem: phase one seeded {seeded} frame(s) from {}..{}, locking off",
        range.start, range.end
    );
    Ok(BootFrameAllocator { table })
}

/// # Safety
/// See [`init_phase_one`].
unsafe fn seed_or_die<M: PhysMapper>(
    table: &mut FrameTable<'_, M>,
    range: Range<VirtualAddress>,
) -> usize {
    match unsafe { table.seed(range) } {
        Ok(seeded) => seeded,
        Err(e) => panic!("kfree: {e}"),
    }
}

impl<'a, M: PhysMapper> BootFrameAllocator<'a, M> {
    /// Seeds `range` and then turns locking on.
    ///
    /// # Panics
    /// If `range` contains a frame outside the managed bounds.
    ///
    /// # Safety
    /// Same contract as [`init_phase_one`] for `range`.
    pub unsafe fn init_phase_two(mut self, range: Range<VirtualAddress>) -> FrameAllocator<'a, M> {
        let seeded = unsafe { seed_or_die(&mut self.table, range.clone()) };
        info!(
            "kmem: phase two seeded {seeded} frame(s) from {}..{}, locking on",
            range.start, range.end
        );
        FrameAllocator::from_table(self.table)
    }

    pub const fn layout(&self) -> &MemoryLayout {
        self.table.layout()
    }

    /// See [`FrameAllocator::allocate`].
    pub fn allocate(&mut self) -> Option<VirtualAddress> {
        self.table.allocate()
    }

    /// See [`FrameAllocator::free`].
    ///
    /// # Panics
    /// On any address [`try_free`](Self::try_free) rejects.
    ///
    /// # Safety
    /// See [`FrameAllocator::free`].
    pub unsafe fn free(&mut self, frame: VirtualAddress) {
        if let Err(e) = unsafe { self.table.free(frame) } {
            panic!("kfree: {e}");
        }
    }

    /// See [`FrameAllocator::try_free`].
    ///
    /// # Errors
    /// See [`FreeError`].
    ///
    /// # Safety
    /// See [`FrameAllocator::free`].
    pub unsafe fn try_free(&mut self, frame: VirtualAddress) -> Result<(), FreeError> {
        unsafe { self.table.free(frame) }
    }

    pub fn increment(&mut self, frame: VirtualAddress) -> u32 {
        self.table.increment(frame)
    }

    pub fn decrement(&mut self, frame: VirtualAddress) -> u32 {
        self.table.decrement(frame)
    }

    #[must_use]
    pub fn read_count(&self, frame: VirtualAddress) -> u32 {
        self.table.read_count(frame)
    }

    #[must_use]
    pub fn free_frame_count(&self) -> usize {
        self.table.free_frame_count()
    }

    #[must_use]
    pub fn is_free(&self, frame: VirtualAddress) -> bool {
        self.table.is_free(frame)
    }

    #[must_use]
    pub fn info(&self) -> MemoryInfo {
        self.table.info()
    }
}
