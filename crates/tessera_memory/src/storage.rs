//! # Slot Storage
//!
//! Dense object pool that hands out stable integer IDs instead of pointers.
//!
//! - Freed slots are reused most-recently-freed first, so hot slots stay hot.
//! - The list of live IDs is rebuilt lazily: any number of allocations and
//!   removals between two [`SlotStorage::occupied`] calls cost one linear scan.
//! - IDs are versioned ([`SlotId`]): a handle to a freed or reused slot is
//!   detected instead of silently aliasing the new occupant.

use std::ops::{Index, IndexMut};

use crate::config::MemoryConfig;
use crate::error::{fault, MemoryError, MemoryResult};

/// Handle to a value in a [`SlotStorage`].
///
/// The low 32 bits are the slot index, which is the dense integer ID
/// (0, 1, 2, ...) that callers store instead of a pointer. The high 32 bits
/// are the slot's generation when the handle was issued. Removing a value
/// bumps its slot's generation, so a handle kept past `remove` or `clear`
/// stops resolving even after the index is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SlotId(u64);

impl SlotId {
    /// Handle that never names a live value: `used` is `false` and `get`
    /// is `None` for it. Also the `Default`, for "no slot yet" fields.
    pub const NULL: Self = Self(u64::MAX);

    /// Builds a handle from a slot index and generation.
    ///
    /// Storages issue their own handles; this is for handles that were
    /// stored as plain integers and are being read back.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation the handle was issued for.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns `true` for [`SlotId::NULL`].
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Counters describing how a storage has been used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Successful `allocate`/`allocate_at` calls.
    pub allocations: u64,
    /// Successful `remove` calls, including slots released by `slow_clear`.
    pub removals: u64,
    /// Full scans performed to refresh the occupancy index.
    pub rebuilds: u64,
}

/// One cell of the backing store.
#[derive(Clone, Debug)]
struct Slot<T> {
    occupied: bool,
    generation: u32,
    value: T,
}

/// Reusable-ID object pool for components and other short-lived game objects.
///
/// Values of free slots are kept around: [`allocate`](Self::allocate) hands
/// back whatever the previous occupant left, so callers must overwrite every
/// field (or use [`insert`](Self::insert)).
///
/// # Thread Safety
///
/// This storage is NOT thread-safe. Use one storage per thread or wrap in a mutex.
///
/// # Example
///
/// ```rust
/// use tessera_memory::SlotStorage;
///
/// let mut storage: SlotStorage<u32> = SlotStorage::new();
/// let a = storage.insert(10);
/// let b = storage.insert(20);
///
/// storage.remove(a);
/// let c = storage.insert(30); // reuses slot of `a`
/// assert_eq!(c.index(), a.index());
/// assert!(!storage.used(a));
///
/// assert_eq!(storage.occupied(), &[c, b]);
/// ```
#[derive(Clone, Debug)]
pub struct SlotStorage<T> {
    /// The backing store.
    slots: Vec<Slot<T>>,
    /// Free list - indices of reusable slots, most recently freed last.
    free_ids: Vec<u32>,
    /// Cached ascending list of live slots.
    occupied: Vec<SlotId>,
    /// Number of live slots.
    count: usize,
    /// Whether `occupied` lags behind `slots`.
    stale: bool,
    /// Generation given to slots created from now on.
    epoch: u32,
    /// Highest generation any slot has reached.
    max_generation: u32,
    stats: StorageStats,
}

impl<T> Default for SlotStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotStorage<T> {
    /// Creates an empty storage without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_ids: Vec::new(),
            occupied: Vec::new(),
            count: 0,
            stale: false,
            epoch: 0,
            max_generation: 0,
            stats: StorageStats {
                allocations: 0,
                removals: 0,
                rebuilds: 0,
            },
        }
    }

    /// Creates an empty storage with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = Self::new();
        storage.slots.reserve(capacity);
        storage.occupied.reserve(capacity);
        storage
    }

    /// Creates an empty storage sized by `config.storage_capacity`.
    #[must_use]
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::with_capacity(config.storage_capacity)
    }

    /// Returns the number of slots, freed ones included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot has been created since the last clear.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of live values.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the reusable slot indices, most recently freed last.
    #[inline]
    #[must_use]
    pub fn free_ids(&self) -> &[u32] {
        &self.free_ids
    }

    /// Returns `true` if the next [`occupied`](Self::occupied) call rebuilds.
    #[inline]
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns usage counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> StorageStats {
        self.stats
    }

    /// Returns whether `id` names a live value.
    #[inline]
    #[must_use]
    pub fn used(&self, id: SlotId) -> bool {
        self.slots
            .get(id.index() as usize)
            .is_some_and(|slot| slot.occupied && slot.generation == id.generation())
    }

    /// Returns the handle of the live value at `index`, if any.
    #[must_use]
    pub fn id_at(&self, index: u32) -> Option<SlotId> {
        let slot = self.slots.get(index as usize)?;
        slot.occupied.then(|| SlotId::new(index, slot.generation))
    }

    /// Gets a reference to a live value.
    #[inline]
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.try_item(id).ok()
    }

    /// Gets a mutable reference to a live value.
    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.try_item_mut(id).ok()
    }

    /// Gets a reference to a live value, reporting why the lookup failed.
    ///
    /// # Errors
    ///
    /// [`MemoryError::OutOfRange`] past the last slot, [`MemoryError::Vacant`]
    /// for a free slot and [`MemoryError::StaleHandle`] for a reused one.
    pub fn try_item(&self, id: SlotId) -> MemoryResult<&T> {
        let index = self.check_live(id)?;
        Ok(&self.slots[index].value)
    }

    /// Mutable twin of [`try_item`](Self::try_item).
    ///
    /// # Errors
    ///
    /// Same as [`try_item`](Self::try_item).
    pub fn try_item_mut(&mut self, id: SlotId) -> MemoryResult<&mut T> {
        let index = self.check_live(id)?;
        Ok(&mut self.slots[index].value)
    }

    /// Returns the value under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is not occupied or `id` is stale.
    #[track_caller]
    #[must_use]
    pub fn item(&self, id: SlotId) -> &T {
        match self.try_item(id) {
            Ok(value) => value,
            Err(error) => fault(&error),
        }
    }

    /// Returns the value under `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the slot is not occupied or `id` is stale.
    #[track_caller]
    pub fn item_mut(&mut self, id: SlotId) -> &mut T {
        if let Err(error) = self.check_live(id) {
            fault(&error);
        }
        &mut self.slots[id.index() as usize].value
    }

    /// Frees the slot under `id` for reuse. The value stays in place until
    /// the slot is allocated again.
    ///
    /// # Errors
    ///
    /// [`MemoryError::DoubleFree`] if the slot is already free,
    /// [`MemoryError::StaleHandle`] if it is occupied by a newer value and
    /// [`MemoryError::OutOfRange`] past the last slot.
    pub fn try_remove(&mut self, id: SlotId) -> MemoryResult<()> {
        let index = id.index();
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or(MemoryError::OutOfRange {
                index: index as usize,
                len,
            })?;
        if !slot.occupied {
            return Err(MemoryError::DoubleFree { index });
        }
        if slot.generation != id.generation() {
            return Err(MemoryError::StaleHandle {
                index,
                handle: id.generation(),
                current: slot.generation,
            });
        }

        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.max_generation = self.max_generation.max(slot.generation);

        self.free_ids.push(index);
        self.count -= 1;
        self.stale = true;
        self.stats.removals += 1;
        Ok(())
    }

    /// Frees the slot under `id` for reuse.
    ///
    /// # Panics
    ///
    /// Panics on double free or a stale handle.
    #[track_caller]
    pub fn remove(&mut self, id: SlotId) {
        if let Err(error) = self.try_remove(id) {
            fault(&error);
        }
    }

    /// Returns all live IDs in ascending index order.
    ///
    /// The list is cached; it is rebuilt with one scan only if the storage
    /// changed since the previous call.
    pub fn occupied(&mut self) -> &[SlotId] {
        if self.stale {
            self.rebuild();
        }
        &self.occupied
    }

    /// Iterates over live values with their handles, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            if slot.occupied {
                Some((SlotId::new(index as u32, slot.generation), &slot.value))
            } else {
                None
            }
        })
    }

    /// Iterates mutably over live values with their handles, in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            if slot.occupied {
                Some((SlotId::new(index as u32, slot.generation), &mut slot.value))
            } else {
                None
            }
        })
    }

    /// Drops every slot, the free list and the occupancy cache. Capacity is
    /// kept. All previously issued IDs become stale.
    pub fn clear(&mut self) {
        tracing::debug!(slots = self.slots.len(), live = self.count, "slot storage cleared");
        self.slots.clear();
        self.free_ids.clear();
        self.occupied.clear();
        self.count = 0;
        self.stale = false;
        self.epoch = self.max_generation.wrapping_add(1);
        self.max_generation = self.epoch;
    }

    /// Index, generation and occupancy check shared by the accessors.
    fn check_live(&self, id: SlotId) -> MemoryResult<usize> {
        let index = id.index() as usize;
        let slot = self.slots.get(index).ok_or(MemoryError::OutOfRange {
            index,
            len: self.slots.len(),
        })?;
        if !slot.occupied {
            return Err(MemoryError::Vacant { index: id.index() });
        }
        if slot.generation != id.generation() {
            return Err(MemoryError::StaleHandle {
                index: id.index(),
                handle: id.generation(),
                current: slot.generation,
            });
        }
        Ok(index)
    }

    fn rebuild(&mut self) {
        self.occupied.clear();
        self.occupied.extend(
            self.slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.occupied)
                .map(|(index, slot)| SlotId::new(index as u32, slot.generation)),
        );
        self.stale = false;
        self.stats.rebuilds += 1;
        tracing::trace!(slots = self.slots.len(), live = self.count, "occupancy index rebuilt");
    }

    /// Index the next created slot will get.
    #[track_caller]
    fn next_index(&self) -> u32 {
        match u32::try_from(self.slots.len()) {
            Ok(index) if index != u32::MAX => index,
            _ => fault(&MemoryError::OutOfRange {
                index: self.slots.len(),
                len: u32::MAX as usize,
            }),
        }
    }

    /// Marks a free slot live and returns its handle.
    fn occupy(&mut self, index: u32) -> (SlotId, &mut T) {
        self.count += 1;
        self.stale = true;
        self.stats.allocations += 1;

        let slot = &mut self.slots[index as usize];
        slot.occupied = true;
        (SlotId::new(index, slot.generation), &mut slot.value)
    }
}

impl<T: Default> SlotStorage<T> {
    /// Allocates a slot and returns its handle and value.
    ///
    /// Reuses the most recently freed slot if there is one, otherwise grows
    /// by one. The value is NOT reset: it holds what the previous occupant
    /// left behind (or `T::default()` for a fresh slot).
    #[track_caller]
    pub fn allocate(&mut self) -> (SlotId, &mut T) {
        let index = match self.free_ids.pop() {
            Some(index) => index,
            None => {
                let index = self.next_index();
                self.push_slot();
                index
            }
        };
        self.occupy(index)
    }

    /// Allocates a slot and moves `value` into it.
    #[track_caller]
    pub fn insert(&mut self, value: T) -> SlotId {
        let (id, slot) = self.allocate();
        *slot = value;
        id
    }

    /// Allocates the slot at exactly `index`, growing with blank slots if
    /// needed. Returns `None` if that slot is already occupied.
    #[track_caller]
    pub fn allocate_at(&mut self, index: u32) -> Option<(SlotId, &mut T)> {
        while self.slots.len() <= index as usize {
            self.blank();
        }
        if self.slots[index as usize].occupied {
            return None;
        }

        if let Some(position) = self.free_ids.iter().rposition(|&free| free == index) {
            self.free_ids.remove(position);
        }
        Some(self.occupy(index))
    }

    /// Appends one free slot and returns its index.
    #[track_caller]
    pub fn blank(&mut self) -> u32 {
        let index = self.next_index();
        self.push_slot();
        self.free_ids.push(index);
        index
    }

    /// Appends `additional` free slots. They are handed out lowest index first.
    #[track_caller]
    pub fn reserve(&mut self, additional: usize) {
        let start = self.slots.len();
        if start.saturating_add(additional) >= u32::MAX as usize {
            fault(&MemoryError::OutOfRange {
                index: start.saturating_add(additional),
                len: u32::MAX as usize,
            });
        }
        self.slots.reserve(additional);
        for _ in 0..additional {
            self.push_slot();
        }
        self.free_ids.reserve(additional);
        // Reversed so that pop() yields the lowest new index first.
        self.free_ids
            .extend((start..self.slots.len()).rev().map(|index| index as u32));
    }

    /// Frees every live slot as [`remove`](Self::remove) would, and resets
    /// each released value to `T::default()` so resources it held are dropped.
    /// Slot count and backing storage are kept.
    pub fn slow_clear(&mut self) {
        let released = self.count;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.occupied {
                slot.occupied = false;
                slot.generation = slot.generation.wrapping_add(1);
                slot.value = T::default();
                self.max_generation = self.max_generation.max(slot.generation);
                self.free_ids.push(index as u32);
            }
        }

        self.occupied.clear();
        self.stale = false;
        self.count = 0;
        self.stats.removals += released as u64;
        tracing::debug!(slots = self.slots.len(), released, "slot storage slow-cleared");
    }

    fn push_slot(&mut self) {
        self.slots.push(Slot {
            occupied: false,
            generation: self.epoch,
            value: T::default(),
        });
    }
}

impl<T> Index<SlotId> for SlotStorage<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, id: SlotId) -> &T {
        self.item(id)
    }
}

impl<T> IndexMut<SlotId> for SlotStorage<T> {
    #[track_caller]
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        self.item_mut(id)
    }
}
