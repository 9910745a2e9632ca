//! Core Tensor type

use super::{Layout, MemoryFormat};
use crate::dtype::DType;
use crate::error::Result;
use crate::runtime::{Runtime, RuntimeClient, TensorHandle};
use std::fmt;

/// View over an opaque runtime tensor handle
///
/// `Tensor` does not own device memory: the handle points into memory whose
/// lifetime belongs to the runtime's scoped pool. Cloning a tensor clones the
/// view, and several tensors may reference the same allocation.
///
/// A tensor can be *undefined* (wrap no handle). Reading any property of an
/// undefined tensor is a caller bug and panics; check [`Tensor::is_defined`]
/// when a handle is optional.
///
/// # Example
///
/// ```ignore
/// use dcast::prelude::*;
///
/// let client = HostRuntime::default_client(&HostRuntime::default_device());
/// let t = client.upload(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2])?;
/// let nhwc = t.with_memory_format(&client, MemoryFormat::Contiguous)?;
/// ```
pub struct Tensor<R: Runtime> {
    handle: Option<R::Handle>,
}

impl<R: Runtime> Tensor<R> {
    /// Wrap a runtime handle
    pub fn from_handle(handle: R::Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A tensor that wraps no handle
    pub fn undefined() -> Self {
        Self { handle: None }
    }

    /// Whether a handle is present
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.handle.is_some()
    }

    /// The wrapped handle
    ///
    /// # Panics
    ///
    /// Panics if the tensor is undefined.
    #[inline]
    #[track_caller]
    pub fn handle(&self) -> &R::Handle {
        match &self.handle {
            Some(handle) => handle,
            None => panic!("tensor handle is not defined"),
        }
    }

    #[track_caller]
    fn handle_mut(&mut self) -> &mut R::Handle {
        match &mut self.handle {
            Some(handle) => handle,
            None => panic!("tensor handle is not defined"),
        }
    }

    /// Unwrap into the runtime handle, if any
    pub fn into_handle(self) -> Option<R::Handle> {
        self.handle
    }

    // ===== Accessors =====

    /// Get the shape
    #[inline]
    #[track_caller]
    pub fn shape(&self) -> &[i64] {
        self.handle().shape()
    }

    /// Get the strides (in elements)
    #[inline]
    #[track_caller]
    pub fn strides(&self) -> &[i64] {
        self.handle().strides()
    }

    /// Number of dimensions
    #[inline]
    #[track_caller]
    pub fn dim(&self) -> usize {
        self.shape().len()
    }

    /// Get the element type
    #[inline]
    #[track_caller]
    pub fn dtype(&self) -> DType {
        self.handle().dtype()
    }

    /// Get the device
    #[inline]
    #[track_caller]
    pub fn device(&self) -> &R::Device {
        self.handle().device()
    }

    /// Number of elements
    #[inline]
    #[track_caller]
    pub fn numel(&self) -> usize {
        self.handle().numel()
    }

    /// Size of one element in bytes
    #[inline]
    #[track_caller]
    pub fn elem_size(&self) -> usize {
        self.handle().elem_size()
    }

    /// Device address for reading
    #[inline]
    #[track_caller]
    pub fn data_ptr(&self) -> u64 {
        self.handle().data_ptr()
    }

    /// Device address for writing
    #[inline]
    #[track_caller]
    pub fn data_ptr_mut(&mut self) -> u64 {
        self.handle_mut().data_ptr_mut()
    }

    /// Shape and strides as a [`Layout`]
    ///
    /// # Panics
    ///
    /// Panics if the handle reports a different number of strides than
    /// dimensions, which breaks the [`TensorHandle`] contract.
    #[track_caller]
    pub fn layout(&self) -> Layout {
        let (shape, strides) = (self.shape(), self.strides());
        match Layout::new(shape, strides) {
            Ok(layout) => layout,
            Err(_) => panic!(
                "tensor handle has {} dims but {} strides",
                shape.len(),
                strides.len()
            ),
        }
    }

    /// Whether both views reference the same allocation
    pub fn shares_storage(&self, other: &Self) -> bool {
        self.is_defined() && other.is_defined() && self.data_ptr() == other.data_ptr()
    }

    // ===== Layout synthesis =====

    /// Request a tensor with the same shape, dtype and device whose strides
    /// realize `format`
    ///
    /// The result is a freshly requested allocation with uninitialized
    /// contents; no data is copied. `Preserve` keeps this tensor's strides.
    pub fn with_memory_format(&self, client: &R::Client, format: MemoryFormat) -> Result<Self> {
        let layout = self.layout().with_format(format)?;
        let handle = client.request_strided_tensor(layout.shape(), layout.strides(), self.dtype())?;
        tracing::debug!(
            shape = ?layout.shape(),
            strides = ?layout.strides(),
            ?format,
            "requested relayout tensor"
        );
        Ok(Self::from_handle(handle))
    }
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Clones the view, not the data
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_defined() {
            return f.write_str("Tensor(undefined)");
        }
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("dtype", &self.dtype())
            .field("device", self.device())
            .field("ptr", &format_args!("0x{:x}", self.data_ptr()))
            .finish()
    }
}

impl<R: Runtime> fmt::Display for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_defined() {
            return f.write_str("Tensor: undefined");
        }
        write!(
            f,
            "Tensor: dim {}, shape: {:?}, stride: {:?}, dtype: {}, ptr: 0x{:x}",
            self.dim(),
            self.shape(),
            self.strides(),
            self.dtype(),
            self.data_ptr()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::host::{HostDevice, HostHandle, HostRuntime};

    fn tensor(shape: &[i64], strides: &[i64]) -> Tensor<HostRuntime> {
        Tensor::from_handle(HostHandle::new(0x1000, shape, strides, DType::F32, HostDevice::new(0)))
    }

    #[test]
    fn test_layout_from_handle() {
        let t = tensor(&[2, 3], &[1, 2]);
        let layout = t.layout();
        assert_eq!(layout.shape(), &[2, 3]);
        assert_eq!(layout.strides(), &[1, 2]);
    }

    #[test]
    #[should_panic(expected = "tensor handle has 2 dims but 1 strides")]
    fn test_layout_rank_mismatch_panics() {
        let t = tensor(&[2, 3], &[1]);
        let _ = t.layout();
    }
}
