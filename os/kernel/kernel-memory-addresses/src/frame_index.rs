use crate::{PageSize, PhysicalAddress, Size4K};
use core::fmt;

/// Number of a 4 KiB physical frame, i.e. `physical address / 4096`.
///
/// Used to address per-frame bookkeeping tables.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FrameIndex(usize);

impl FrameIndex {
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Physical base address of the frame.
    #[inline]
    #[must_use]
    pub const fn base(self) -> PhysicalAddress {
        PhysicalAddress::new((self.0 as u64) << Size4K::SHIFT)
    }

    /// Number of frames needed to cover `[0, top)`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn count_below(top: PhysicalAddress) -> usize {
        top.as_u64().div_ceil(Size4K::SIZE) as usize
    }
}

impl fmt::Debug for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame#{}", self.0)
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FrameIndex> for usize {
    #[inline]
    fn from(index: FrameIndex) -> Self {
        index.as_usize()
    }
}
