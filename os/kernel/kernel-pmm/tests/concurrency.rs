mod common;

use common::{Arena, FRAME_BYTES};
use kernel_memory_addresses::VirtualAddress;
use std::sync::Barrier;
use std::thread;

const FRAMES: usize = 64;
const THREADS: usize = 8;
const ROUNDS: usize = 500;

#[test]
fn concurrent_allocate_and_free() {
    let arena = Arena::new(FRAMES);
    let mut counts = arena.counts();
    let empty = arena.start()..arena.start();
    let boot = arena.boot(&mut counts, empty);
    let kmem = unsafe { boot.init_phase_two(arena.start()..arena.end()) };
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for id in 0..THREADS {
            let kmem = &kmem;
            let barrier = &barrier;
            s.spawn(move || {
                let tag = u8::try_from(id + 1).unwrap();
                barrier.wait();
                for _ in 0..ROUNDS {
                    let Some(frame) = kmem.allocate() else {
                        thread::yield_now();
                        continue;
                    };
                    // Nobody else may hold this frame right now.
                    fill(frame, tag);
                    thread::yield_now();
                    assert!(holds(frame, tag), "frame {frame} handed out twice");
                    unsafe { kmem.free(frame) };
                }
            });
        }
    });

    let info = kmem.info();
    assert_eq!(info.free_frames, FRAMES);
    assert_eq!(info.referenced_frames, 0);
}

#[test]
fn concurrent_sharing_settles_to_zero() {
    const N: usize = 8;
    let arena = Arena::new(N);
    let mut counts = arena.counts();

    // Phase one: only the lower half is seeded, and early boot takes two
    // frames before any lock exists.
    let early = arena.start()..arena.frame(N / 2);
    let mut boot = arena.boot(&mut counts, early);
    let pinned = boot.allocate().unwrap();
    assert_eq!(boot.increment(pinned), 2);
    let shared = boot.allocate().unwrap();
    assert_eq!(boot.free_frame_count(), N / 2 - 2);

    let kmem = unsafe { boot.init_phase_two(arena.frame(N / 2)..arena.end()) };
    assert_eq!(kmem.free_frame_count(), N - 2);
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for _ in 0..THREADS {
            let kmem = &kmem;
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                for _ in 0..ROUNDS {
                    kmem.increment(shared);
                    let scratch = kmem.allocate();
                    let info = kmem.info();
                    assert_eq!(info.free_frames + info.referenced_frames, N);
                    if let Some(frame) = scratch {
                        unsafe { kmem.free(frame) };
                    }
                    unsafe { kmem.free(shared) };
                }
            });
        }
    });

    // Only the boot-phase owners are left.
    assert_eq!(kmem.read_count(shared), 1);
    assert_eq!(kmem.read_count(pinned), 2);
    assert!(!kmem.is_free(shared));
    assert!(!kmem.is_free(pinned));
    assert_eq!(kmem.free_frame_count(), N - 2);

    unsafe {
        kmem.free(shared);
        kmem.free(pinned);
        kmem.free(pinned);
    }
    assert_eq!(kmem.free_frame_count(), N);
    assert_eq!(kmem.info().referenced_frames, 0);
}

fn fill(frame: VirtualAddress, tag: u8) {
    unsafe { std::ptr::write_bytes(frame.as_mut_ptr::<u8>(), tag, FRAME_BYTES) };
}

fn holds(frame: VirtualAddress, tag: u8) -> bool {
    let bytes = unsafe { std::slice::from_raw_parts(frame.as_mut_ptr::<u8>(), FRAME_BYTES) };
    bytes.iter().all(|&b| b == tag)
}
