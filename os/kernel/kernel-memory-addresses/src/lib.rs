//! # Virtual and Physical Memory Address Types
//!
//! Strongly typed wrappers for raw memory addresses and frame numbers used by
//! the physical frame allocator.
//!
//! ## Overview
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`VirtualAddress`] | An address the kernel can dereference (direct map / kernel image). |
//! | [`PhysicalAddress`] | A RAM address as seen by the memory controller. Never dereferenced. |
//! | [`FrameIndex`] | `physical address >> 12`; the slot of a frame in per-frame tables. |
//!
//! The [`PageSize`] trait carries the frame granularity at the type level. Only
//! [`Size4K`] exists; the allocator manages exactly one frame size.
//!
//! ## Typical Usage
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let va = VirtualAddress::new(0x8011_2345);
//! let frame = va.align_down::<Size4K>();
//! assert!(frame.is_aligned::<Size4K>());
//!
//! let pa = PhysicalAddress::new(0x0011_2000);
//! assert_eq!(pa.frame_index().as_usize(), 0x112);
//! assert_eq!(pa.frame_index().base(), pa);
//! ```
//!
//! ## Design Notes
//!
//! - The types are `#[repr(transparent)]` and implement `Copy`, `Eq`, `Ord`, and
//!   `Hash`.
//! - Alignment math is `const fn`; overflow-prone rounding returns `Option`.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod frame_index;
mod page_size;
mod physical_address;
mod virtual_address;

pub use frame_index::FrameIndex;
pub use page_size::{PageSize, Size4K};
pub use physical_address::PhysicalAddress;
pub use virtual_address::VirtualAddress;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_helpers() {
        let a = VirtualAddress::new(0x12345);
        assert_eq!(a.align_down::<Size4K>().as_u64(), 0x12000);
        assert_eq!(
            a.align_up::<Size4K>().map(VirtualAddress::as_u64),
            Some(0x13000)
        );
        assert!(!a.is_aligned::<Size4K>());

        let b = VirtualAddress::new(0x13000);
        assert_eq!(b.align_up::<Size4K>(), Some(b));
        assert!(b.is_aligned::<Size4K>());
    }

    #[test]
    fn align_up_overflow_is_none() {
        let top = VirtualAddress::new(u64::MAX - 10);
        assert_eq!(top.align_up::<Size4K>(), None);
        assert_eq!(top.checked_add(Size4K::SIZE), None);
    }

    #[test]
    fn frame_index_roundtrip() {
        let pa = PhysicalAddress::new(0x0000_0010_2000_0042);
        let idx = pa.frame_index();
        assert_eq!(idx.as_usize(), 0x0000_0010_2000_0042 >> 12);
        assert_eq!(idx.base(), pa.align_down::<Size4K>());
        assert_eq!(PhysicalAddress::from(idx).as_u64(), 0x0000_0010_2000_0000);
    }

    #[test]
    fn frame_count_rounds_up() {
        assert_eq!(FrameIndex::count_below(PhysicalAddress::new(0)), 0);
        assert_eq!(FrameIndex::count_below(PhysicalAddress::new(4096)), 1);
        assert_eq!(FrameIndex::count_below(PhysicalAddress::new(4097)), 2);
        assert_eq!(
            FrameIndex::count_below(PhysicalAddress::new(0xE00_0000)),
            0xE000
        );
    }

    #[test]
    fn pointer_roundtrip() {
        let mut slot = 0u64;
        let va = VirtualAddress::from_ptr((&raw mut slot).cast_const());
        let p = va.as_mut_ptr::<u64>();
        unsafe { p.write(7) };
        slot += 1;
        assert_eq!(slot, 8);
    }
}
