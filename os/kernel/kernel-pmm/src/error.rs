//! Error types of the frame allocator.

use kernel_memory_addresses::{FrameIndex, PhysicalAddress, VirtualAddress};

/// Why an address cannot be handed back to the allocator.
///
/// Every variant means kernel bookkeeping is already corrupt; [`free`] turns
/// them into a panic.
///
/// [`free`]: crate::FrameAllocator::free
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FreeError {
    #[error("{0} is not frame aligned")]
    Misaligned(VirtualAddress),
    #[error("{addr} lies below the kernel end {kernel_end}")]
    BelowKernelEnd {
        addr: VirtualAddress,
        kernel_end: VirtualAddress,
    },
    #[error("{addr} is backed by {phys}, at or above the physical top {phys_top}")]
    AbovePhysTop {
        addr: VirtualAddress,
        phys: PhysicalAddress,
        phys_top: PhysicalAddress,
    },
    #[error("{0} has no physical frame")]
    Unmapped(VirtualAddress),
    #[error("frame {index} of {addr} has no reference count slot")]
    NoSlot {
        addr: VirtualAddress,
        index: FrameIndex,
    },
}

/// The allocator cannot be constructed over the given memory layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("reference count table has {have} slots, {need} needed to cover up to {phys_top}")]
    TableTooSmall {
        have: usize,
        need: usize,
        phys_top: PhysicalAddress,
    },
    #[error("kernel end must not be the null address")]
    NullKernelEnd,
}

/// A global frame allocator has been installed already.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a global frame allocator is already installed")]
pub struct InstallError;
