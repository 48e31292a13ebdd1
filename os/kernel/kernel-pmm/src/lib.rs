//! # Kernel Physical Frame Allocator
//!
//! Hands out 4 KiB physical frames, counts how many owners share each frame,
//! and takes frames back once the last owner lets go. The counts are what make
//! copy-on-write sharing safe: every owner calls [`FrameAllocator::free`]
//! once, and the frame is reclaimed exactly once, when the count hits zero.
//!
//! ## Architecture Overview
//!
//! ```text
//!   BootFrameAllocator  ── init_phase_two ──►  FrameAllocator
//!    (&mut, no lock)                            (&, SpinMutex)
//!            │                                        │
//!            └──────────────┬─────────────────────────┘
//!                           │ exclusive access
//! ┌─────────────────────────▼───────────────────────────┐
//! │                    Frame table                      │
//! │    • intrusive LIFO free list inside free frames    │
//! │    • one reference count per physical frame         │
//! │    • managed window [kernel_end, phys_top)          │
//! └─────────────────────────┬───────────────────────────┘
//!                           │ virt_to_phys
//! ┌─────────────────────────▼───────────────────────────┐
//! │                 PhysMapper (HHDM)                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! 1. [`init_phase_one`] runs on the boot core with no working locks. It seeds
//!    the free list from the memory the early page tables map.
//! 2. [`BootFrameAllocator::init_phase_two`] seeds the rest of memory and only
//!    then puts the state behind a lock. The bootstrap allocator is consumed,
//!    so unsynchronized access after this point does not compile.
//! 3. The resulting [`FrameAllocator`] is shared by all cores, usually through
//!    [`global::install`].
//!
//! ## Errors
//!
//! * Running out of frames is ordinary: [`FrameAllocator::allocate`] returns
//!   `None`.
//! * Freeing an address outside the managed window is kernel corruption and
//!   panics. [`FrameAllocator::try_free`] reports the same conditions as a
//!   [`FreeError`] for callers that can still do something about it.
//! * Dropping an owner of a frame without owners is clamped at zero and
//!   logged, not treated as an error.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod allocator;
mod bootstrap;
mod error;
mod frame_table;
mod free_list;
pub mod global;
mod layout;
mod phys_mapper;
mod ref_counts;

pub use allocator::FrameAllocator;
pub use bootstrap::{BootFrameAllocator, init_phase_one};
pub use error::{FreeError, InstallError, LayoutError};
pub use frame_table::MemoryInfo;
pub use free_list::{FREE_LINK_BYTES, POISON_BYTE};
pub use layout::MemoryLayout;
pub use phys_mapper::{HhdmPhysMapper, PhysMapper};
