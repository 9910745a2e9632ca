//! Trait for the per-invocation context operators run in

use super::Runtime;
use crate::cast::CastOp;
use crate::dtype::DType;
use crate::error::Result;
use crate::tensor::{Layout, TensorDesc};

/// Context handed to operator implementations
///
/// Gives access to the queue, the scoped pool tensors are requested from,
/// and the kernel library's cast entry point. Everything launched through a
/// client is enqueued on its single queue in call order.
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Queue all casts are enqueued on
    fn queue(&self) -> &R::Queue;

    /// Get the scoped pool for this client
    fn allocator(&self) -> &R::Allocator;

    /// Wait for all pending operations to complete
    fn synchronize(&self);

    /// Request an uninitialized tensor with explicit strides
    fn request_strided_tensor(
        &self,
        shape: &[i64],
        strides: &[i64],
        dtype: DType,
    ) -> Result<R::Handle>;

    /// Request an uninitialized row-major tensor
    fn request_tensor(&self, shape: &[i64], dtype: DType) -> Result<R::Handle> {
        let layout = Layout::contiguous(shape)?;
        self.request_strided_tensor(shape, layout.strides(), dtype)
    }

    /// Request raw scratch memory (a one-dimensional byte tensor)
    fn request_buffer(&self, num_bytes: usize) -> Result<R::Handle>;

    /// Kernel library cast entry point
    ///
    /// Converts every element of `src_ptr` (described by `src`) with `op`
    /// and writes the results to `dst_ptr` (described by `dst`). Elements
    /// are paired in logical index order, so the two descriptors may have
    /// different strides.
    fn cast_data_type(
        &self,
        src: &TensorDesc,
        src_ptr: u64,
        op: CastOp,
        dst: &TensorDesc,
        dst_ptr: u64,
    ) -> Result<()>;
}
