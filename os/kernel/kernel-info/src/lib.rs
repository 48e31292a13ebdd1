//! # Kernel Memory Layout Configuration
//!
//! Compile-time layout constants shared between the kernel and the physical
//! frame allocator. Everything here is a plain `const` checked by compile-time
//! assertions; there is no runtime state.
//!
//! ```text
//! Physical Memory Layout:
//! 0x0000_0000 ┌─────────────────────────────────┐
//!             │     Low Memory (< 1MiB)         │
//! PHYS_LOAD   ├─────────────────────────────────┤ 0x0010_0000
//!             │       Kernel Image              │
//!    end      ├─────────────────────────────────┤
//!             │    Free frames (phase one)      │
//! EARLY_MAP   ├─────────────────────────────────┤ 0x0040_0000
//!             │    Free frames (phase two)      │
//! PHYS_TOP    └─────────────────────────────────┘ 0x0E00_0000
//! ```
//!
//! The kernel sees all of it through the direct map at
//! [`DIRECT_MAP_BASE`](memory::DIRECT_MAP_BASE).

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod memory;
