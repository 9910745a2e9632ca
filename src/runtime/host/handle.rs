//! Host tensor handle

use super::{HostDevice, HostRuntime};
use crate::dtype::DType;
use crate::runtime::TensorHandle;
use crate::tensor::{Shape, Strides};

/// Tensor handle handed out by [`super::HostClient`]
///
/// Points at the start of a pool block; the block outlives the handle only
/// until the pool scope is reset.
#[derive(Clone, Debug)]
pub struct HostHandle {
    ptr: u64,
    shape: Shape,
    strides: Strides,
    dtype: DType,
    device: HostDevice,
}

impl HostHandle {
    pub(crate) fn new(
        ptr: u64,
        shape: &[i64],
        strides: &[i64],
        dtype: DType,
        device: HostDevice,
    ) -> Self {
        Self {
            ptr,
            shape: shape.iter().copied().collect(),
            strides: strides.iter().copied().collect(),
            dtype,
            device,
        }
    }
}

impl TensorHandle<HostRuntime> for HostHandle {
    fn shape(&self) -> &[i64] {
        &self.shape
    }

    fn strides(&self) -> &[i64] {
        &self.strides
    }

    fn dtype(&self) -> DType {
        self.dtype
    }

    fn device(&self) -> &HostDevice {
        &self.device
    }

    fn numel(&self) -> usize {
        self.shape
            .iter()
            .map(|&extent| usize::try_from(extent).unwrap_or(0))
            .product()
    }

    fn data_ptr(&self) -> u64 {
        self.ptr
    }

    fn data_ptr_mut(&mut self) -> u64 {
        self.ptr
    }
}
