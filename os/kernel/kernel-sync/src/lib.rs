//! # Kernel synchronization primitives
//!
//! Busy-waiting locks for code that may run on several cores at once but
//! cannot sleep: the raw lock word ([`RawSpin`]), a data-owning [`Mutex`] that is
//! generic over the raw lock, and a [`SyncOnceCell`] for one-time global
//! installation of kernel singletons.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod mutex;
mod raw_spin;
mod sync_once_cell;

pub use mutex::{Mutex, MutexGuard};
pub use raw_spin::RawSpin;
pub use sync_once_cell::SyncOnceCell;

pub type SpinMutex<T> = Mutex<T, RawSpin>;

impl<T> SpinMutex<T> {
    pub const fn new(value: T) -> Self {
        Self::from_raw(RawSpin::new(), value)
    }
}

/// Acquire side of a raw lock. Blocks (spins) until the lock is held.
pub trait RawLock {
    fn raw_lock(&self);
    fn raw_try_lock(&self) -> bool;
}

/// Release side of a raw lock.
pub trait RawUnlock {
    /// # Safety
    /// The caller must currently hold the lock.
    unsafe fn raw_unlock(&self);
}
