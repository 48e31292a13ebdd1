//! # Virtual-to-physical translation
//!
//! The allocator identifies frames by kernel virtual address but keys its
//! bookkeeping by physical frame number. How a virtual address translates is up
//! to the kernel's paging setup, so it is abstracted behind [`PhysMapper`].
//!
//! ## Example
//! ```rust
//! use kernel_memory_addresses::{PhysicalAddress, VirtualAddress};
//! use kernel_pmm::{HhdmPhysMapper, PhysMapper};
//!
//! let mapper = HhdmPhysMapper::new(0xffff_8880_0000_0000);
//! let va = VirtualAddress::new(0xffff_8880_0020_3000);
//! assert_eq!(mapper.virt_to_phys(va), Some(PhysicalAddress::new(0x20_3000)));
//! assert_eq!(mapper.frame_index(va).map(|i| i.as_usize()), Some(0x203));
//! assert_eq!(mapper.virt_to_phys(VirtualAddress::new(0x1000)), None);
//! ```

use kernel_info::memory::DIRECT_MAP_BASE;
use kernel_memory_addresses::{FrameIndex, PhysicalAddress, VirtualAddress};

/// Translates kernel virtual addresses to the physical frames backing them.
///
/// Implementations must be deterministic and must succeed for every address
/// in the managed range.
pub trait PhysMapper {
    /// The physical address backing `va`, or `None` if `va` is not mapped.
    fn virt_to_phys(&self, va: VirtualAddress) -> Option<PhysicalAddress>;

    /// The frame containing `va`.
    fn frame_index(&self, va: VirtualAddress) -> Option<FrameIndex> {
        self.virt_to_phys(va).map(PhysicalAddress::frame_index)
    }
}

/// [`PhysMapper`] for a higher-half direct map (HHDM): physical memory is
/// visible at `base + pa`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HhdmPhysMapper {
    base: u64,
}

impl HhdmPhysMapper {
    #[must_use]
    pub const fn new(base: u64) -> Self {
        Self { base }
    }

    /// The kernel's direct map at [`DIRECT_MAP_BASE`].
    #[must_use]
    pub const fn kernel() -> Self {
        Self::new(DIRECT_MAP_BASE)
    }

    /// Where `pa` is visible in the direct map.
    #[must_use]
    pub const fn phys_to_virt(&self, pa: PhysicalAddress) -> VirtualAddress {
        VirtualAddress::new(self.base.wrapping_add(pa.as_u64()))
    }
}

impl PhysMapper for HhdmPhysMapper {
    #[inline]
    fn virt_to_phys(&self, va: VirtualAddress) -> Option<PhysicalAddress> {
        va.as_u64().checked_sub(self.base).map(PhysicalAddress::new)
    }
}
