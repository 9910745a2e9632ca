//! Data type system for dcast tensors
//!
//! This module provides the `DType` enum naming every element type an
//! accelerator tensor can carry, the `DTypeSet` bit set used for operand and
//! operator-capability sets, and the promotion lattice that picks one common
//! dtype for a group of operands.

mod element;
mod promotion;

pub use element::Element;
pub use promotion::{PROMOTION_PRECEDENCE, fallback_target, natural_target, promotion_target};

use std::fmt;

// ============================================================================
// DType Enum
// ============================================================================

/// Element types known to the adapter
///
/// # Discriminant Values
///
/// Discriminants are dense (`0..DType::COUNT`) so that they can index the
/// cast lookup tables directly:
/// - Bool: 0
/// - Signed ints: 1-4 (I8=1, I16=2, I32=3, I64=4)
/// - Unsigned ints: 5-8 (U8=5, U16=6, U32=7, U64=8)
/// - Floats: 9-11 (F16=9, F32=10, F64=11)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DType {
    /// Boolean type (one byte per element)
    Bool = 0,

    /// 8-bit signed integer
    I8 = 1,
    /// 16-bit signed integer
    I16 = 2,
    /// 32-bit signed integer
    I32 = 3,
    /// 64-bit signed integer
    I64 = 4,

    /// 8-bit unsigned integer
    U8 = 5,
    /// 16-bit unsigned integer
    U16 = 6,
    /// 32-bit unsigned integer
    U32 = 7,
    /// 64-bit unsigned integer
    U64 = 8,

    /// 16-bit floating point (IEEE 754)
    F16 = 9,
    /// 32-bit floating point
    F32 = 10,
    /// 64-bit floating point
    F64 = 11,
}

impl DType {
    /// Number of dtypes; every `index()` is below this
    pub const COUNT: usize = 12;

    /// Every dtype in ascending index order
    pub const ALL: [DType; Self::COUNT] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F16,
        Self::F32,
        Self::F64,
    ];

    /// Dense table index
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F16 | Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 | Self::Bool => 1,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32 | Self::F16)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16 | Self::I8)
    }

    /// Returns true if this is an unsigned integer type
    #[inline]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::U64 | Self::U32 | Self::U16 | Self::U8)
    }

    /// Returns true if this is any integer type (signed or unsigned)
    #[inline]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Returns true if this is a boolean type
    #[inline]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

// ============================================================================
// DTypeSet
// ============================================================================

/// Bit set of dtypes, one bit per `DType::index()`
///
/// Used for the distinct dtypes found among operands and for the dtypes an
/// operator kernel accepts.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct DTypeSet {
    bits: u32,
}

const fn bit(dtype: DType) -> u32 {
    1 << dtype.index()
}

impl DTypeSet {
    /// Empty set
    pub const EMPTY: Self = Self { bits: 0 };

    /// Floating point dtypes
    pub const FLOATS: Self = Self::of(&[DType::F16, DType::F32, DType::F64]);

    /// Set holding only `dtype`
    #[inline]
    pub const fn single(dtype: DType) -> Self {
        Self { bits: bit(dtype) }
    }

    /// Set holding every dtype of `dtypes`; duplicates collapse
    pub const fn of(dtypes: &[DType]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < dtypes.len() {
            bits |= bit(dtypes[i]);
            i += 1;
        }
        Self { bits }
    }

    /// Membership test
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.bits & bit(dtype) != 0
    }

    /// Whether the sets share a dtype
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.bits & other.bits != 0
    }

    /// Add `dtype`
    #[inline]
    pub fn insert(&mut self, dtype: DType) {
        self.bits |= bit(dtype);
    }

    /// Check if set is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Number of dtypes in the set
    #[inline]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate members in ascending index order
    pub fn iter(self) -> impl Iterator<Item = DType> {
        DType::ALL.into_iter().filter(move |&dt| self.contains(dt))
    }
}

impl FromIterator<DType> for DTypeSet {
    fn from_iter<T: IntoIterator<Item = DType>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for dtype in iter {
            set.insert(dtype);
        }
        set
    }
}

impl From<DType> for DTypeSet {
    fn from(dtype: DType) -> Self {
        Self::single(dtype)
    }
}

impl fmt::Debug for DTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, dtype) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dtype}")?;
        }
        write!(f, "}}")
    }
}
