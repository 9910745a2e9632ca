//! Kernel-facing tensor descriptors

use super::{Layout, Shape, Strides, Tensor};
use crate::dtype::DType;
use crate::runtime::Runtime;

/// Descriptor passed to the kernel library next to a data pointer
///
/// Carries the strides of the view it was taken from; kernels walk elements
/// in logical (row-major index) order through them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorDesc {
    dtype: DType,
    shape: Shape,
    strides: Strides,
}

impl TensorDesc {
    /// Describe `tensor`
    pub fn new<R: Runtime>(tensor: &Tensor<R>) -> Self {
        Self {
            dtype: tensor.dtype(),
            shape: tensor.shape().iter().copied().collect(),
            strides: tensor.strides().iter().copied().collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(dtype: DType, shape: &[i64], strides: &[i64]) -> Self {
        Self {
            dtype,
            shape: shape.iter().copied().collect(),
            strides: strides.iter().copied().collect(),
        }
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Dimension extents
    #[inline]
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// Strides in elements
    #[inline]
    pub fn strides(&self) -> &[i64] {
        &self.strides
    }

    /// Number of elements described
    pub fn numel(&self) -> usize {
        self.shape
            .iter()
            .map(|&extent| usize::try_from(extent).unwrap_or(0))
            .product()
    }

    /// Whether the strides are row-major for the shape
    pub fn is_contiguous(&self) -> bool {
        Layout::new(&self.shape, &self.strides).is_ok_and(|layout| layout.is_contiguous())
    }
}
