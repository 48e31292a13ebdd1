//! # Per-frame reference counts
//!
//! One counter per physical frame number, covering all of physical memory up
//! to the layout's `phys_top`. Slots outside the managed window simply stay 0.

use kernel_memory_addresses::FrameIndex;

/// Outcome of dropping one owner of a frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Release {
    /// Owners remain; the frame stays allocated.
    Shared(u32),
    /// The last owner is gone.
    Last,
    /// The count was already zero and stays there.
    Clamped,
}

impl Release {
    pub const fn count(self) -> u32 {
        match self {
            Self::Shared(n) => n,
            Self::Last | Self::Clamped => 0,
        }
    }
}

/// Reference count table over caller-provided storage.
pub struct RefCounts<'a> {
    slots: &'a mut [u32],
}

impl<'a> RefCounts<'a> {
    /// Takes over `slots` and zeroes them.
    pub fn new(slots: &'a mut [u32]) -> Self {
        slots.fill(0);
        Self { slots }
    }

    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    pub const fn contains(&self, index: FrameIndex) -> bool {
        index.as_usize() < self.slots.len()
    }

    pub fn get(&self, index: FrameIndex) -> Option<u32> {
        self.slots.get(index.as_usize()).copied()
    }

    pub fn set(&mut self, index: FrameIndex, count: u32) -> Option<()> {
        *self.slots.get_mut(index.as_usize())? = count;
        Some(())
    }

    /// Adds an owner and returns the new count.
    pub fn acquire(&mut self, index: FrameIndex) -> Option<u32> {
        let slot = self.slots.get_mut(index.as_usize())?;
        *slot = slot.saturating_add(1);
        Some(*slot)
    }

    /// Drops an owner. Never goes below zero.
    pub fn release(&mut self, index: FrameIndex) -> Option<Release> {
        let slot = self.slots.get_mut(index.as_usize())?;
        Some(match *slot {
            0 => Release::Clamped,
            1 => {
                *slot = 0;
                Release::Last
            }
            n => {
                *slot = n - 1;
                Release::Shared(n - 1)
            }
        })
    }

    /// Number of frames with at least one owner.
    pub fn referenced(&self) -> usize {
        self.slots.iter().filter(|&&c| c > 0).count()
    }
}
