//! Host-side stand-in for physical memory.

#![allow(dead_code)]

use kernel_memory_addresses::{PhysicalAddress, VirtualAddress};
use kernel_pmm::{
    BootFrameAllocator, FREE_LINK_BYTES, HhdmPhysMapper, MemoryLayout, POISON_BYTE, init_phase_one,
};
use std::ops::Range;
use std::ptr::NonNull;

pub const FRAME: u64 = 4096;
pub const FRAME_BYTES: usize = 4096;

/// Physical address the first arena frame pretends to live at.
pub const PHYS_BASE: u64 = 0x0010_0000;

/// A 4 KiB-aligned raw frame.
#[repr(C, align(4096))]
pub struct Frame([u8; FRAME_BYTES]);

/// `n` heap frames posing as physical memory `[PHYS_BASE, PHYS_BASE + n * 4096)`,
/// direct-mapped at their real heap address.
pub struct Arena {
    frames: NonNull<Frame>,
    len: usize,
}

impl Arena {
    pub fn new(len: usize) -> Self {
        let boxed: Box<[Frame]> = (0..len).map(|_| Frame([0xEE; FRAME_BYTES])).collect();
        let frames = NonNull::new(Box::into_raw(boxed).cast::<Frame>()).unwrap();
        Self { frames, len }
    }

    pub fn start(&self) -> VirtualAddress {
        VirtualAddress::from_nonnull(self.frames)
    }

    pub fn end(&self) -> VirtualAddress {
        self.frame(self.len)
    }

    pub fn frame(&self, i: usize) -> VirtualAddress {
        let phys = PhysicalAddress::new(PHYS_BASE) + i as u64 * FRAME;
        self.mapper().phys_to_virt(phys)
    }

    pub fn frames(&self) -> impl Iterator<Item = VirtualAddress> + '_ {
        (0..self.len).map(|i| self.frame(i))
    }

    pub fn mapper(&self) -> HhdmPhysMapper {
        HhdmPhysMapper::new(self.start().as_u64() - PHYS_BASE)
    }

    /// Kernel image ends where the arena begins; physical memory ends with it.
    pub fn layout(&self) -> MemoryLayout {
        let phys_top = PhysicalAddress::new(PHYS_BASE) + self.len as u64 * FRAME;
        MemoryLayout::new(self.start(), phys_top)
    }

    /// Zeroed storage big enough for the count table.
    pub fn counts(&self) -> Vec<u32> {
        vec![0; self.layout().tracked_frames()]
    }

    /// Phase one over `range` with the arena's own layout and mapper.
    pub fn boot<'c>(
        &self,
        counts: &'c mut [u32],
        range: Range<VirtualAddress>,
    ) -> BootFrameAllocator<'c, HhdmPhysMapper> {
        let boot = unsafe { init_phase_one(self.layout(), self.mapper(), counts, range) };
        boot.unwrap()
    }

    /// Snapshot of a frame's bytes.
    pub fn bytes(&self, va: VirtualAddress) -> Vec<u8> {
        unsafe { std::slice::from_raw_parts(va.as_mut_ptr::<u8>(), FRAME_BYTES).to_vec() }
    }

    /// Whether everything past the free-list link holds the poison byte.
    pub fn is_poisoned(&self, va: VirtualAddress) -> bool {
        let bytes = self.bytes(va);
        bytes[FREE_LINK_BYTES..].iter().all(|&b| b == POISON_BYTE)
    }

    pub fn write(&self, va: VirtualAddress, byte: u8) {
        unsafe { std::ptr::write_bytes(va.as_mut_ptr::<u8>(), byte, FRAME_BYTES) }
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let slice = std::ptr::slice_from_raw_parts_mut(self.frames.as_ptr(), self.len);
        drop(unsafe { Box::from_raw(slice) });
    }
}
