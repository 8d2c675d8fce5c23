//! # Quick Pool
//!
//! Bump allocator for per-frame scratch objects that are all thrown away at once.

use crate::config::MemoryConfig;

/// A cursor-based pool of reusable `T` values.
///
/// Handing out an object just advances a cursor; nothing is freed
/// individually. [`restart`](Self::restart) rewinds the cursor so the same
/// objects get handed out again, which means a pool only ever grows to the
/// peak number of objects used between two restarts.
///
/// References returned by [`item`](Self::item) and [`over`](Self::over)
/// borrow the pool, so none of them can be held across a `restart`.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread.
///
/// # Example
///
/// ```rust
/// use tessera_memory::QuickPool;
///
/// #[derive(Default)]
/// struct Hit { damage: u32 }
///
/// let mut pool: QuickPool<Hit> = QuickPool::new();
/// pool.over(Hit { damage: 4 });
/// pool.item().damage = 9;
/// assert_eq!(pool.issued().iter().map(|h| h.damage).sum::<u32>(), 13);
///
/// // End of frame: everything goes back
/// pool.restart();
/// assert_eq!(pool.in_use(), 0);
/// assert_eq!(pool.capacity(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct QuickPool<T> {
    /// Every object the pool has ever created.
    items: Vec<T>,
    /// Index of the next object to hand out.
    cursor: usize,
}

impl<T> Default for QuickPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QuickPool<T> {
    /// Creates an empty pool without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }

    /// Creates an empty pool with room for `capacity` objects.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Creates an empty pool sized by `config.pool_capacity`.
    #[must_use]
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::with_capacity(config.pool_capacity)
    }

    /// Returns the number of objects handed out since the last restart.
    #[inline]
    #[must_use]
    pub const fn in_use(&self) -> usize {
        self.cursor
    }

    /// Returns the number of pooled objects.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    /// Returns the objects handed out since the last restart.
    #[inline]
    #[must_use]
    pub fn issued(&self) -> &[T] {
        &self.items[..self.cursor]
    }

    /// Places `value` at the cursor and returns it.
    pub fn over(&mut self, value: T) -> &mut T {
        if self.cursor == self.items.len() {
            self.items.push(value);
        } else {
            self.items[self.cursor] = value;
        }
        self.cursor += 1;
        &mut self.items[self.cursor - 1]
    }

    /// Makes every pooled object available again. Contents are left as they
    /// are and get overwritten on the next [`item`](Self::item)/[`over`](Self::over).
    pub fn restart(&mut self) {
        tracing::trace!(
            reclaimed = self.cursor,
            pooled = self.items.len(),
            "quick pool restarted"
        );
        self.cursor = 0;
    }

    /// Drops pooled objects beyond `len`, rewinding the cursor if needed.
    pub fn shrink_to(&mut self, len: usize) {
        self.items.truncate(len);
        self.cursor = self.cursor.min(len);
    }
}

impl<T: Default> QuickPool<T> {
    /// Returns a default-valued object from the pool, growing by one if
    /// every pooled object is in use.
    pub fn item(&mut self) -> &mut T {
        self.over(T::default())
    }
}
