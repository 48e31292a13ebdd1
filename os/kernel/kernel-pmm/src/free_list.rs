use core::iter;
use core::ptr::{self, NonNull};
use kernel_info::memory::FRAME_SIZE;
use kernel_memory_addresses::VirtualAddress;

/// Byte written over every frame when its last owner releases it.
pub const POISON_BYTE: u8 = 0x01;

/// Bytes at the start of a free frame that hold the list link instead of
/// [`POISON_BYTE`].
pub const FREE_LINK_BYTES: usize = size_of::<FreeFrame>();

/// Header stored at the beginning of every **free** frame.
///
/// ```text
/// +-------------+------------------------------------------+
/// | FreeFrame   |  POISON_BYTE ... (FRAME_SIZE - header)   |
/// +-------------+------------------------------------------+
/// ^ frame                                    frame + FRAME_SIZE ^
/// ```
///
/// The header only exists while the frame is on the list; an allocated frame
/// is opaque bytes.
#[repr(C)]
struct FreeFrame {
    /// Next free frame (or `None` at the tail).
    next: Option<NonNull<FreeFrame>>,
}

/// Intrusive LIFO stack of free frames.
///
/// # Invariants
/// - Every node is a frame-aligned frame owned by the allocator.
/// - A frame appears at most once and never while it has an owner.
pub struct FreeList {
    head: Option<NonNull<FreeFrame>>,
}

// Safety: The list is only reachable through the allocator, which serializes
// access (by `&mut` during bootstrap, by its lock afterwards).
unsafe impl Send for FreeList {}

impl FreeList {
    pub const fn new() -> Self {
        Self { head: None }
    }

    #[cfg(test)]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Poison `frame` and make it the new head.
    ///
    /// # Safety
    /// - `frame` must be frame aligned, mapped writable for [`FRAME_SIZE`] bytes
    ///   and not referenced by anyone else.
    /// - `frame` must not already be on the list.
    pub unsafe fn push(&mut self, frame: NonNull<u8>) {
        #[allow(clippy::cast_possible_truncation)]
        let len = FRAME_SIZE as usize;
        let node = frame.cast::<FreeFrame>();
        unsafe {
            ptr::write_bytes(frame.as_ptr(), POISON_BYTE, len);
            node.write(FreeFrame { next: self.head });
        }
        self.head = Some(node);
    }

    /// Unlink the head frame. Its contents are left as they are.
    pub fn pop(&mut self) -> Option<VirtualAddress> {
        let node = self.head?;
        // Safety: nodes on the list are valid free frames (see `push`).
        self.head = unsafe { node.as_ref().next };
        Some(VirtualAddress::from_nonnull(node))
    }

    pub fn iter(&self) -> impl Iterator<Item = VirtualAddress> + '_ {
        // Safety: nodes on the list are valid free frames (see `push`).
        iter::successors(self.head, |node| unsafe { node.as_ref().next })
            .map(VirtualAddress::from_nonnull)
    }

    /// Walks the whole list.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn contains(&self, frame: VirtualAddress) -> bool {
        self.iter().any(|va| va == frame)
    }
}
