//! Virtual-to-real index translation with a locality cache.
//!
//! Sparse storage keeps elements sorted by virtual index. Lookups start at
//! the most recently touched real position and walk toward the target, so
//! sequential and local access patterns cost O(1) amortized.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Most recently used real index.
///
/// Interior mutability lets `&self` lookups refresh the cache; relaxed
/// ordering is enough because the value is only a hint and is validated
/// against the current bounds before every walk.
#[derive(Debug, Default)]
pub(crate) struct Cursor(AtomicUsize);

impl Cursor {
    #[inline]
    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set(&self, real: usize) {
        self.0.store(real, Ordering::Relaxed);
    }

    /// Locate `target` starting from the cached position and refresh the
    /// cache with the outcome.
    pub(crate) fn seek<E>(
        &self,
        items: &[E],
        target: usize,
        key: impl Fn(&E) -> usize,
    ) -> Result<usize, usize> {
        let found = seek_from(items, target, self.get(), key);
        self.set(match found {
            Ok(real) | Err(real) => real,
        });
        found
    }
}

impl Clone for Cursor {
    fn clone(&self) -> Self {
        Cursor(AtomicUsize::new(self.get()))
    }
}

/// Walk from `start` to the element whose key equals `target`.
///
/// Returns `Ok(real)` on a hit and `Err(insertion)` on a miss, with the same
/// meaning as [`slice::binary_search`]. `items` must be strictly ascending by
/// `key`. An out-of-range `start` is clamped.
pub(crate) fn seek_from<E>(
    items: &[E],
    target: usize,
    start: usize,
    key: impl Fn(&E) -> usize,
) -> Result<usize, usize> {
    if items.is_empty() {
        return Err(0);
    }
    let mut i = start.min(items.len() - 1);

    if key(&items[i]) <= target {
        while i < items.len() && key(&items[i]) < target {
            i += 1;
        }
        if i < items.len() && key(&items[i]) == target {
            Ok(i)
        } else {
            Err(i)
        }
    } else {
        while i > 0 && key(&items[i - 1]) > target {
            i -= 1;
        }
        if i > 0 && key(&items[i - 1]) == target {
            Ok(i - 1)
        } else {
            Err(i)
        }
    }
}
