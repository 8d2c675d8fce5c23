//! # TESSERA Memory Toolkit
//!
//! Allocation-conscious containers for high-frequency-mutation workloads
//! (game objects, components, per-frame scratch data):
//! - Stable integer handles instead of pointers
//! - Freed space is reused, never returned to the allocator mid-game
//! - Bookkeeping is deferred until someone actually asks for it
//!
//! ## Containers
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SlotStorage`] | Reusable-ID object pool with lazily rebuilt occupancy list |
//! | [`QuickPool`] | Bump allocator for objects that all die at end of frame |
//! | [`OrderedMap`] | Hash-indexed map over a dense, reorderable sequence |
//! | [`SortedSet`] | Small set of scalars, linear scan or bisection by size |
//! | [`DynVec`] | Growable sequence with iterative quicksort and sorted insert |
//!
//! ## Architecture Rules
//!
//! 1. **No internal locking** - every container has exactly one owner
//! 2. **Misuse is fatal** - double free or vacant access panics with a
//!    [`MemoryError`] diagnostic; nothing is silently repaired
//! 3. **References never outlive a mutation** - enforced by borrowing, and
//!    for slot handles additionally by generation checks
//!
//! ## Example
//!
//! ```rust
//! use tessera_memory::{MemoryConfig, SlotStorage};
//!
//! #[derive(Default)]
//! struct Bullet { x: f32, y: f32, ttl: u16 }
//!
//! let config = MemoryConfig::from_toml_str("storage_capacity = 4096").unwrap();
//! let mut bullets: SlotStorage<Bullet> = SlotStorage::from_config(&config);
//!
//! let id = bullets.insert(Bullet { x: 0.0, y: 0.0, ttl: 60 });
//! bullets[id].ttl -= 1;
//!
//! for &id in bullets.occupied().to_vec().iter() {
//!     bullets.remove(id);
//! }
//! assert_eq!(bullets.count(), 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod compare;
pub mod config;
pub mod error;
pub mod ordered;
pub mod pool;
pub mod set;
pub mod storage;
pub mod vec;

pub use config::{MemoryConfig, DEFAULT_LINEAR_THRESHOLD};
pub use error::{MemoryError, MemoryResult};
pub use ordered::{Entry, OrderedMap};
pub use pool::QuickPool;
pub use set::SortedSet;
pub use storage::{SlotId, SlotStorage, StorageStats};
pub use vec::DynVec;
