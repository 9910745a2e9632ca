//! Introspection trait for opaque tensor handles

use super::Runtime;
use crate::dtype::DType;

/// Property accessors of a runtime's tensor handle
///
/// One implementation per runtime adapts whatever the runtime hands out.
/// Strides are in elements, not bytes; an extent of `-1` marks a degenerate
/// (unknown) dimension.
pub trait TensorHandle<R: Runtime>: Clone + Send + Sync {
    /// Dimension extents
    fn shape(&self) -> &[i64];

    /// Per-dimension strides in elements
    fn strides(&self) -> &[i64];

    /// Element type
    fn dtype(&self) -> DType;

    /// Device holding the data
    fn device(&self) -> &R::Device;

    /// Number of elements
    fn numel(&self) -> usize;

    /// Size of one element in bytes
    fn elem_size(&self) -> usize {
        self.dtype().size_in_bytes()
    }

    /// Device address for reading
    fn data_ptr(&self) -> u64;

    /// Device address for writing
    fn data_ptr_mut(&mut self) -> u64;
}
