//! # Phase two: the shared, locked allocator

use crate::error::FreeError;
use crate::frame_table::{FrameTable, MemoryInfo};
use crate::layout::MemoryLayout;
use crate::phys_mapper::PhysMapper;
use kernel_memory_addresses::VirtualAddress;
use kernel_sync::SpinMutex;

/// The frame allocator once the kernel runs on several cores.
///
/// Obtained from [`BootFrameAllocator::init_phase_two`](crate::BootFrameAllocator::init_phase_two).
/// Every operation holds one spin lock over the free list and the reference
/// count table for its whole duration, so operations are totally ordered. The
/// lock is not reentrant and does not mask interrupts; callers in interrupt
/// context must mask them first.
pub struct FrameAllocator<'a, M> {
    layout: MemoryLayout,
    table: SpinMutex<FrameTable<'a, M>>,
}

impl<'a, M: PhysMapper> FrameAllocator<'a, M> {
    pub(crate) fn from_table(table: FrameTable<'a, M>) -> Self {
        Self {
            layout: *table.layout(),
            table: SpinMutex::new(table),
        }
    }

    pub const fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Takes a frame off the free list and makes the caller its only owner.
    ///
    /// The frame's contents are not cleared. Returns `None` when memory is
    /// exhausted; that is for the caller to handle.
    pub fn allocate(&self) -> Option<VirtualAddress> {
        self.table.lock().allocate()
    }

    /// Drops one owner of `frame`.
    ///
    /// Only when no owner remains is the frame filled with
    /// [`POISON_BYTE`](crate::POISON_BYTE) and put back on the free list;
    /// otherwise it is left untouched. A frame whose count is already zero is
    /// clamped at zero and reclaimed.
    ///
    /// # Panics
    /// If `frame` is misaligned, below the kernel end, not backed by memory
    /// below the physical top, or has no reference count slot. All of these
    /// mean kernel state is corrupt.
    ///
    /// # Safety
    /// The caller gives up its ownership. If it was the last owner, nobody may
    /// touch the frame afterwards.
    pub unsafe fn free(&self, frame: VirtualAddress) {
        if let Err(e) = unsafe { self.try_free(frame) } {
            panic!("kfree: {e}");
        }
    }

    /// [`free`](Self::free) that reports invalid addresses instead of panicking.
    /// Nothing is modified on error.
    ///
    /// # Errors
    /// See [`FreeError`].
    ///
    /// # Safety
    /// See [`free`](Self::free).
    pub unsafe fn try_free(&self, frame: VirtualAddress) -> Result<(), FreeError> {
        unsafe { self.table.lock().free(frame) }
    }

    /// Adds an owner to `frame` and returns the new count.
    ///
    /// # Panics
    /// If `frame` does not resolve to a reference count slot.
    pub fn increment(&self, frame: VirtualAddress) -> u32 {
        self.table.lock().increment(frame)
    }

    /// Removes an owner from `frame` and returns the new count, clamped at zero.
    ///
    /// This never reclaims the frame, even when the count reaches zero; only
    /// [`free`](Self::free) does that.
    ///
    /// # Panics
    /// If `frame` does not resolve to a reference count slot.
    pub fn decrement(&self, frame: VirtualAddress) -> u32 {
        self.table.lock().decrement(frame)
    }

    /// # Panics
    /// If `frame` does not resolve to a reference count slot.
    #[must_use]
    pub fn read_count(&self, frame: VirtualAddress) -> u32 {
        self.table.lock().read_count(frame)
    }

    /// Length of the free list. Walks the list; diagnostics only.
    #[must_use]
    pub fn free_frame_count(&self) -> usize {
        self.table.lock().free_frame_count()
    }

    /// Whether `frame` is currently on the free list. Walks the list.
    #[must_use]
    pub fn is_free(&self, frame: VirtualAddress) -> bool {
        self.table.lock().is_free(frame)
    }

    /// Consistent snapshot of free and referenced frames.
    #[must_use]
    pub fn info(&self) -> MemoryInfo {
        self.table.lock().info()
    }
}
