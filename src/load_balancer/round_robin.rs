//! Round-robin cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-service rotation index.
///
/// The stored value always stays in `[0, len)`: every advance is a single
/// atomic read-modify-write that wraps modulo the list length, so concurrent
/// callers never observe the same slot twice in one lap.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current position and move the cursor one step forward.
    ///
    /// `len` must be the (fixed, non-zero) length of the list being rotated.
    pub fn advance(&self, len: usize) -> usize {
        debug_assert!(len > 0);
        let previous = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some((current + 1) % len)
            });
        // The closure never returns None, so both arms carry the old value.
        match previous {
            Ok(index) | Err(index) => index % len,
        }
    }

    /// Position the next call to `advance` will return.
    pub fn position(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
}
