//! Process-wide allocation counters.
//!
//! `TallyAllocator` wraps any [`GlobalAlloc`] and keeps running totals that
//! [`crate::TallyEngine`] reads. Install it as the global allocator to feed
//! the counters:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: profgate::TallyAllocator<std::alloc::System> =
//!     profgate::TallyAllocator::new(std::alloc::System);
//! ```
//!
//! When it is not installed the counters stay at zero and snapshots come
//! out empty rather than wrong.

use std::alloc::{GlobalAlloc, Layout};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATION_COUNT: AtomicU64 = AtomicU64::new(0);
static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static FREE_COUNT: AtomicU64 = AtomicU64::new(0);
static FREED_BYTES: AtomicU64 = AtomicU64::new(0);

pub struct TallyAllocator<A> {
    inner: A,
}

impl<A> TallyAllocator<A> {
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for TallyAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
            ALLOCATED_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        FREE_COUNT.fetch_add(1, Ordering::Relaxed);
        FREED_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
            ALLOCATED_BYTES.fetch_add(new_size as u64, Ordering::Relaxed);
            FREE_COUNT.fetch_add(1, Ordering::Relaxed);
            FREED_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
        }
        new_ptr
    }
}

/// A point-in-time reading of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyReading {
    pub allocation_count: u64,
    pub allocated_bytes: u64,
    pub free_count: u64,
    pub freed_bytes: u64,
}

impl TallyReading {
    /// Counter movement since `earlier`. Saturating, so a reading taken
    /// out of order yields zeros instead of wrapping.
    pub fn since(&self, earlier: &TallyReading) -> TallyReading {
        TallyReading {
            allocation_count: self.allocation_count.saturating_sub(earlier.allocation_count),
            allocated_bytes: self.allocated_bytes.saturating_sub(earlier.allocated_bytes),
            free_count: self.free_count.saturating_sub(earlier.free_count),
            freed_bytes: self.freed_bytes.saturating_sub(earlier.freed_bytes),
        }
    }
}

pub fn tally_reading() -> TallyReading {
    TallyReading {
        allocation_count: ALLOCATION_COUNT.load(Ordering::Relaxed),
        allocated_bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
        free_count: FREE_COUNT.load(Ordering::Relaxed),
        freed_bytes: FREED_BYTES.load(Ordering::Relaxed),
    }
}
