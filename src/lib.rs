//! # dcast
//!
//! **Dtype promotion and cast orchestration for accelerator operator adapters.**
//!
//! Accelerator kernels accept only a subset of element types, and the
//! hardware cast unit converts only some dtype pairs natively. dcast sits
//! between an operator and its kernel: it picks the common dtype a group of
//! operands should be brought to, works out whether each conversion is one
//! native cast or a hop through `int32`, and enqueues the casts on the
//! operator's context.
//!
//! ## Features
//!
//! - **Promotion**: category-based target selection with a fixed precedence fallback
//! - **Cast planning**: compile-time direct and special-pair tables
//! - **Tensor views**: introspection over opaque runtime handles, memory-format strides
//! - **Runtime contract**: traits an accelerator binding implements
//! - **Host runtime**: in-memory reference implementation of that contract
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dcast::prelude::*;
//!
//! let client = HostRuntime::default_client(&HostRuntime::default_device());
//! let mut a = client.upload(&[1.0f32, 2.0], &[2])?;
//! let mut b = client.upload(&[3i32, 4], &[2])?;
//!
//! let target = client.promote_all(&mut [&mut a, &mut b], DTypeSet::of(&[DType::F16, DType::F32]))?;
//! assert_eq!(target, DType::F32);
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded host conversion kernel

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cast;
pub mod dtype;
pub mod error;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cast::{CastOps, CastPlan};
    pub use crate::dtype::{DType, DTypeSet};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::host::{HostClient, HostDevice, HostRuntime};
    pub use crate::runtime::{Allocator, Device, Runtime, RuntimeClient, TensorHandle};
    pub use crate::tensor::{Layout, MemoryFormat, Tensor};
}
