//! Element conversion kernel for the host runtime
//!
//! Elements are paired in logical (row-major index) order: the source and
//! destination descriptors each map that order to storage through their own
//! strides. Row-major pairs take a flat fast path.
//!
//! Conversion rules:
//! - integer to integer wraps (two's complement truncation)
//! - float to integer truncates toward zero and saturates; NaN becomes 0
//! - anything to bool is `value != 0`
//! - float narrowing rounds to nearest even

use crate::dtype::DType;
use crate::tensor::{Shape, TensorDesc};
use half::f16;
use smallvec::smallvec;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Element count above which conversion is split across threads
#[cfg(feature = "rayon")]
const PARALLEL_THRESHOLD: usize = 1 << 16;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Value {
    Int(i128),
    Float(f64),
}

impl Value {
    fn is_nonzero(self) -> bool {
        match self {
            Self::Int(v) => v != 0,
            Self::Float(v) => v != 0.0,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Convert every element described by `src_desc` into `dst_desc`
///
/// Both descriptors must describe the same number of elements, have
/// non-negative strides, and their blocks must back every offset they reach.
pub(super) fn cast_strided(
    src: &[u8],
    src_desc: &TensorDesc,
    dst: &mut [u8],
    dst_desc: &TensorDesc,
) {
    let (src_dtype, dst_dtype) = (src_desc.dtype(), dst_desc.dtype());
    if src_desc.is_contiguous() && dst_desc.is_contiguous() {
        cast_elements(src, src_dtype, dst, dst_dtype, src_desc.numel());
        return;
    }

    let src_size = src_dtype.size_in_bytes();
    let dst_size = dst_dtype.size_in_bytes();
    for (s, d) in LogicalOffsets::new(src_desc).zip(LogicalOffsets::new(dst_desc)) {
        let value = load(&src[s * src_size..][..src_size], src_dtype);
        store(value, dst_dtype, &mut dst[d * dst_size..][..dst_size]);
    }
}

/// Storage offsets (in elements) of a strided view, in row-major index order
struct LogicalOffsets<'a> {
    shape: &'a [i64],
    strides: &'a [i64],
    index: Shape,
    offset: i64,
    remaining: usize,
}

impl<'a> LogicalOffsets<'a> {
    fn new(desc: &'a TensorDesc) -> Self {
        Self {
            shape: desc.shape(),
            strides: desc.strides(),
            index: smallvec![0; desc.shape().len()],
            offset: 0,
            remaining: desc.numel(),
        }
    }
}

impl Iterator for LogicalOffsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.offset;

        // Odometer step: bump the last dimension, carry into slower ones
        for dim in (0..self.shape.len()).rev() {
            if self.index[dim] + 1 < self.shape[dim] {
                self.index[dim] += 1;
                self.offset += self.strides[dim];
                break;
            }
            self.offset -= self.strides[dim] * self.index[dim];
            self.index[dim] = 0;
        }
        usize::try_from(current).ok()
    }
}

/// Convert the first `numel` elements of `src` into `dst`
///
/// Both slices must hold at least `numel` elements of their dtype.
fn cast_elements(
    src: &[u8],
    src_dtype: DType,
    dst: &mut [u8],
    dst_dtype: DType,
    numel: usize,
) {
    let src_size = src_dtype.size_in_bytes();
    let dst_size = dst_dtype.size_in_bytes();
    let src = &src[..numel * src_size];
    let dst = &mut dst[..numel * dst_size];

    let convert = |(s, d): (&[u8], &mut [u8])| store(load(s, src_dtype), dst_dtype, d);

    #[cfg(feature = "rayon")]
    {
        if numel > PARALLEL_THRESHOLD {
            src.par_chunks_exact(src_size)
                .zip(dst.par_chunks_exact_mut(dst_size))
                .for_each(convert);
            return;
        }
    }

    src.chunks_exact(src_size)
        .zip(dst.chunks_exact_mut(dst_size))
        .for_each(convert);
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

fn load(bytes: &[u8], dtype: DType) -> Value {
    match dtype {
        DType::Bool => Value::Int(i128::from(bytes[0] != 0)),
        DType::I8 => Value::Int(i8::from_le_bytes(array(bytes)).into()),
        DType::I16 => Value::Int(i16::from_le_bytes(array(bytes)).into()),
        DType::I32 => Value::Int(i32::from_le_bytes(array(bytes)).into()),
        DType::I64 => Value::Int(i64::from_le_bytes(array(bytes)).into()),
        DType::U8 => Value::Int(bytes[0].into()),
        DType::U16 => Value::Int(u16::from_le_bytes(array(bytes)).into()),
        DType::U32 => Value::Int(u32::from_le_bytes(array(bytes)).into()),
        DType::U64 => Value::Int(u64::from_le_bytes(array(bytes)).into()),
        DType::F16 => Value::Float(f16::from_le_bytes(array(bytes)).to_f64()),
        DType::F32 => Value::Float(f32::from_le_bytes(array(bytes)).into()),
        DType::F64 => Value::Float(f64::from_le_bytes(array(bytes))),
    }
}

macro_rules! store_int {
    ($value:expr, $ty:ty, $out:expr) => {{
        let v: $ty = match $value {
            Value::Int(v) => v as $ty,
            Value::Float(v) => v as $ty,
        };
        $out.copy_from_slice(&v.to_le_bytes());
    }};
}

fn store(value: Value, dtype: DType, out: &mut [u8]) {
    match dtype {
        DType::Bool => out[0] = u8::from(value.is_nonzero()),
        DType::I8 => store_int!(value, i8, out),
        DType::I16 => store_int!(value, i16, out),
        DType::I32 => store_int!(value, i32, out),
        DType::I64 => store_int!(value, i64, out),
        DType::U8 => store_int!(value, u8, out),
        DType::U16 => store_int!(value, u16, out),
        DType::U32 => store_int!(value, u32, out),
        DType::U64 => store_int!(value, u64, out),
        DType::F16 => out.copy_from_slice(&f16::from_f64(value.to_f64()).to_le_bytes()),
        DType::F32 => out.copy_from_slice(&(value.to_f64() as f32).to_le_bytes()),
        DType::F64 => out.copy_from_slice(&value.to_f64().to_le_bytes()),
    }
}
