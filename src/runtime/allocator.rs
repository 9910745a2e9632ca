//! Scoped memory pool trait
//!
//! Device memory requested while an operator runs belongs to the context,
//! not to the tensors or to the cast engine. The pool hands out blocks and
//! reclaims them all at once when the scope ends.

use crate::error::Result;

/// Scoped pool allocator for runtime backends
///
/// There is no per-block deallocation: callers never free, the scope owner
/// calls [`Allocator::reset`] when the invocation is over.
pub trait Allocator: Clone + Send + Sync {
    /// Allocate a zeroed block of the given size
    ///
    /// Returns the device address of the block.
    fn allocate(&self, size_bytes: usize) -> Result<u64>;

    /// Release every block of the current scope
    fn reset(&self);

    /// Number of blocks handed out in the current scope
    fn allocation_count(&self) -> usize {
        0 // Default: tracking not supported
    }

    /// Get the total allocated bytes in the current scope
    fn allocated_bytes(&self) -> usize {
        0 // Default: tracking not supported
    }
}
