//! Tensor views and layouts
//!
//! This module provides `Tensor`, a view over a runtime's opaque tensor
//! handle, together with the `Layout` arithmetic used to request tensors in
//! a different memory format and the descriptors handed to kernels.

mod core;
mod desc;
mod layout;

pub use core::Tensor;
pub use desc::TensorDesc;
pub use layout::{DEGENERATE_STRIDE, Layout, MemoryFormat, Shape, Strides, format_strides};
