//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::Pod;
use half::f16;

/// Trait for host types that can be moved into and out of a tensor
///
/// Connects Rust's type system to the runtime dtype tags. `Bool` has no
/// implementor since `bool` is not `Pod`; boolean tensors are moved as raw
/// bytes (`0`/`1`).
pub trait Element: Copy + Send + Sync + Pod + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_element! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f16 => F16,
    f32 => F32,
    f64 => F64,
}
