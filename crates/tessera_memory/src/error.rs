//! # Memory Error Types
//!
//! All errors that can occur in the memory toolkit.
//!
//! Most of these are misuse faults: the panicking operations format the
//! same variants, so a `try_*` probe and a fatal panic report identically.

use thiserror::Error;

/// Errors that can occur in the memory toolkit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Attempted to free a slot that is already free.
    #[error("double free: slot {index} is not occupied")]
    DoubleFree {
        /// The slot index.
        index: u32,
    },

    /// Attempted to access a slot that holds no live value.
    #[error("accessing non occupied slot {index}")]
    Vacant {
        /// The slot index.
        index: u32,
    },

    /// Handle generation does not match the slot (slot was freed and reused, or cleared).
    #[error("stale handle: slot {index} is at generation {current}, handle has {handle}")]
    StaleHandle {
        /// The slot index.
        index: u32,
        /// Generation carried by the handle.
        handle: u32,
        /// Generation currently stored in the slot.
        current: u32,
    },

    /// Index past the end of a container.
    #[error("index out of range: {index} >= {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Container length at the time of access.
        len: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    Io(String),
}

/// Result type for memory toolkit operations.
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Raises a misuse fault.
///
/// Logs the violated invariant before panicking so the diagnostic survives
/// `panic = "abort"` builds that have a subscriber attached.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn fault(error: &MemoryError) -> ! {
    tracing::warn!(%error, "memory misuse fault");
    panic!("{error}");
}

/// Panics with [`MemoryError::OutOfRange`] unless `index < len`.
#[inline]
#[track_caller]
pub(crate) fn check_index(index: usize, len: usize) {
    if index >= len {
        fault(&MemoryError::OutOfRange { index, len });
    }
}
