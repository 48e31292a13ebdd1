//! # Allocator state
//!
//! [`FrameTable`] is everything the allocator knows: the free list, the
//! reference count table and the bounds of managed memory. It is only ever
//! accessed exclusively, either through `&mut` during bootstrap or under the
//! allocator's lock afterwards, so all operations here take `&mut self` and do
//! no synchronization of their own.

use crate::error::{FreeError, LayoutError};
use crate::free_list::FreeList;
use crate::layout::MemoryLayout;
use crate::phys_mapper::PhysMapper;
use crate::ref_counts::{RefCounts, Release};
use core::ops::Range;
use core::ptr::NonNull;
use kernel_info::memory::FRAME_SIZE;
use kernel_memory_addresses::{FrameIndex, Size4K, VirtualAddress};
use log::{trace, warn};

/// Diagnostic snapshot of the allocator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Frames currently on the free list.
    pub free_frames: usize,
    /// Frames with at least one owner.
    pub referenced_frames: usize,
    /// Slots in the reference count table.
    pub tracked_frames: usize,
}

pub struct FrameTable<'a, M> {
    layout: MemoryLayout,
    mapper: M,
    counts: RefCounts<'a>,
    free: FreeList,
}

impl<'a, M: PhysMapper> FrameTable<'a, M> {
    /// An empty table: no free frames, all counts zero.
    pub fn new(
        layout: MemoryLayout,
        mapper: M,
        counts: &'a mut [u32],
    ) -> Result<Self, LayoutError> {
        if layout.kernel_end.as_u64() == 0 {
            return Err(LayoutError::NullKernelEnd);
        }
        let need = layout.tracked_frames();
        if counts.len() < need {
            return Err(LayoutError::TableTooSmall {
                have: counts.len(),
                need,
                phys_top: layout.phys_top,
            });
        }
        Ok(Self {
            layout,
            mapper,
            counts: RefCounts::new(counts),
            free: FreeList::new(),
        })
    }

    pub const fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Resolves `frame` to its count slot, enforcing the managed bounds.
    fn check(&self, frame: VirtualAddress) -> Result<FrameIndex, FreeError> {
        if !frame.is_aligned::<Size4K>() {
            return Err(FreeError::Misaligned(frame));
        }
        if frame < self.layout.kernel_end {
            return Err(FreeError::BelowKernelEnd {
                addr: frame,
                kernel_end: self.layout.kernel_end,
            });
        }
        let phys = self
            .mapper
            .virt_to_phys(frame)
            .ok_or(FreeError::Unmapped(frame))?;
        if phys >= self.layout.phys_top {
            return Err(FreeError::AbovePhysTop {
                addr: frame,
                phys,
                phys_top: self.layout.phys_top,
            });
        }
        self.index_of(frame)
    }

    /// Resolves `frame` to its count slot without range checks.
    fn index_of(&self, frame: VirtualAddress) -> Result<FrameIndex, FreeError> {
        let index = self
            .mapper
            .frame_index(frame)
            .ok_or(FreeError::Unmapped(frame))?;
        if self.counts.contains(index) {
            Ok(index)
        } else {
            Err(FreeError::NoSlot { addr: frame, index })
        }
    }

    /// Like [`index_of`](Self::index_of), but a failure is fatal.
    fn slot(&self, frame: VirtualAddress) -> FrameIndex {
        match self.index_of(frame) {
            Ok(index) => index,
            Err(e) => panic!("kmem: {e}"),
        }
    }

    pub fn allocate(&mut self) -> Option<VirtualAddress> {
        let frame = self.free.pop()?;
        let index = self.slot(frame);
        self.counts.set(index, 1);
        trace!("kalloc: {frame}");
        Some(frame)
    }

    /// Drops one owner of `frame` and reclaims it once none remain.
    ///
    /// # Safety
    /// If this releases the last owner, nobody may access `frame` afterwards.
    pub unsafe fn free(&mut self, frame: VirtualAddress) -> Result<(), FreeError> {
        let index = self.check(frame)?;
        match self.counts.release(index) {
            Some(Release::Shared(n)) => {
                trace!("kfree: {frame} still has {n} owner(s)");
            }
            Some(Release::Last) => unsafe { self.reclaim(frame) },
            Some(Release::Clamped) => {
                warn!("kfree: {frame} had no owners, count clamped at 0");
                unsafe { self.reclaim(frame) }
            }
            None => return Err(FreeError::NoSlot { addr: frame, index }),
        }
        Ok(())
    }

    /// # Safety
    /// `frame` has passed [`check`](Self::check) and has no owners.
    unsafe fn reclaim(&mut self, frame: VirtualAddress) {
        // `check` rejects everything below the non-null kernel end.
        let Some(ptr) = NonNull::new(frame.as_mut_ptr::<u8>()) else {
            unreachable!("kfree: null frame passed bounds check");
        };
        unsafe { self.free.push(ptr) };
        trace!("kfree: {frame} reclaimed");
    }

    /// Hands every complete frame in `range` to the free list.
    ///
    /// Returns the number of frames seeded.
    ///
    /// # Safety
    /// The whole range must be unused memory the allocator may take over.
    pub unsafe fn seed(&mut self, range: Range<VirtualAddress>) -> Result<usize, FreeError> {
        let Some(mut frame) = range.start.align_up::<Size4K>() else {
            return Ok(0);
        };
        let mut seeded = 0;
        while let Some(frame_end) = frame.checked_add(FRAME_SIZE) {
            if frame_end > range.end {
                break;
            }
            let index = self.check(frame)?;
            // Fresh frames start at zero owners, so the release clamps. That is
            // expected here and not worth the warning `free` would log.
            if matches!(
                self.counts.release(index),
                Some(Release::Last | Release::Clamped)
            ) {
                unsafe { self.reclaim(frame) };
            }
            self.counts.set(index, 0);
            seeded += 1;
            frame = frame_end;
        }
        Ok(seeded)
    }

    pub fn increment(&mut self, frame: VirtualAddress) -> u32 {
        let index = self.slot(frame);
        self.counts.acquire(index).unwrap_or_default()
    }

    pub fn decrement(&mut self, frame: VirtualAddress) -> u32 {
        let index = self.slot(frame);
        let release = self.counts.release(index).unwrap_or(Release::Clamped);
        if release == Release::Clamped {
            warn!("kmem: decrement of {frame} clamped at 0");
        }
        release.count()
    }

    pub fn read_count(&self, frame: VirtualAddress) -> u32 {
        let index = self.slot(frame);
        self.counts.get(index).unwrap_or_default()
    }

    pub fn free_frame_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_free(&self, frame: VirtualAddress) -> bool {
        self.free.contains(frame)
    }

    pub fn info(&self) -> MemoryInfo {
        MemoryInfo {
            free_frames: self.free.len(),
            referenced_frames: self.counts.referenced(),
            tracked_frames: self.counts.len(),
        }
    }
}
