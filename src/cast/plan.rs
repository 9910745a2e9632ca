//! Cast-path resolution
//!
//! The accelerator's cast unit converts only some dtype pairs natively. The
//! rest of the supported pairs go through [`INTERMEDIATE_DTYPE`]: the first
//! hop is an ordinary direct cast into the intermediate, the second hop is
//! the op named by the special-pair table.
//!
//! Both tables are dense `DType::COUNT × DType::COUNT` arrays built at
//! compile time, so resolution is two array lookups.

use crate::dtype::DType;
use crate::error::{Error, Result};
use std::fmt;

/// Dtype every two-hop cast passes through
pub const INTERMEDIATE_DTYPE: DType = DType::I32;

/// Hardware cast operation code
///
/// Identified by the dtype pair it converts; kernels receive it alongside the
/// input and output descriptors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CastOp {
    src: DType,
    dst: DType,
}

impl CastOp {
    const fn new(src: DType, dst: DType) -> Self {
        Self { src, dst }
    }

    /// Dtype the op reads
    #[inline]
    pub const fn src(self) -> DType {
        self.src
    }

    /// Dtype the op writes
    #[inline]
    pub const fn dst(self) -> DType {
        self.dst
    }

    /// Packed 32-bit code: source index in the high half, destination in the low half
    #[inline]
    pub const fn code(self) -> u32 {
        ((self.src.index() as u32) << 16) | self.dst.index() as u32
    }
}

impl fmt::Display for CastOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.src, self.dst)
    }
}

/// Resolved conversion path for one dtype pair
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastPlan {
    /// One native cast
    Direct(CastOp),
    /// Cast into `intermediate` with `first`, then apply `second`
    TwoHop {
        /// Dtype of the scratch tensor between the hops
        intermediate: DType,
        /// Direct op from the source into the intermediate
        first: CastOp,
        /// Special-pair op from the intermediate into the destination
        second: CastOp,
    },
}

impl CastPlan {
    /// Number of hardware cast invocations
    pub const fn hops(&self) -> usize {
        match self {
            Self::Direct(_) => 1,
            Self::TwoHop { .. } => 2,
        }
    }

    /// Ops in launch order
    pub fn ops(&self) -> Vec<CastOp> {
        match *self {
            Self::Direct(op) => vec![op],
            Self::TwoHop { first, second, .. } => vec![first, second],
        }
    }

    /// Op that produces the destination dtype
    pub const fn final_op(&self) -> CastOp {
        match *self {
            Self::Direct(op) => op,
            Self::TwoHop { second, .. } => second,
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

type CastTable = [[Option<CastOp>; DType::COUNT]; DType::COUNT];

const fn build_table(pairs: &[(DType, DType)]) -> CastTable {
    let mut table: CastTable = [[None; DType::COUNT]; DType::COUNT];
    let mut i = 0;
    while i < pairs.len() {
        let (src, dst) = pairs[i];
        table[src.index()][dst.index()] = Some(CastOp::new(src, dst));
        i += 1;
    }
    table
}

const fn build_special_table(entries: &[(DType, DType, DType)]) -> CastTable {
    let mut table: CastTable = [[None; DType::COUNT]; DType::COUNT];
    let mut i = 0;
    while i < entries.len() {
        let (src, dst, op_dst) = entries[i];
        table[src.index()][dst.index()] = Some(CastOp::new(INTERMEDIATE_DTYPE, op_dst));
        i += 1;
    }
    table
}

/// Pairs the cast unit converts natively
const DIRECT_PAIRS: &[(DType, DType)] = {
    use DType::*;
    &[
        (Bool, I32),
        (Bool, F16),
        (Bool, F32),
        (I8, I16),
        (I8, I32),
        (I8, F16),
        (I8, F32),
        (U8, I32),
        (U8, I64),
        (U8, F16),
        (U8, F32),
        (I16, I32),
        (I16, F16),
        (I16, F32),
        (I32, Bool),
        (I32, I8),
        (I32, I16),
        (I32, I64),
        (I32, F16),
        (I32, F32),
        (I64, I32),
        (I64, U8),
        (I64, F16),
        (I64, F32),
        (F16, Bool),
        (F16, I8),
        (F16, U8),
        (F16, I16),
        (F16, I32),
        (F16, I64),
        (F16, F32),
        (F32, Bool),
        (F32, I8),
        (F32, U8),
        (F32, I16),
        (F32, I32),
        (F32, I64),
        (F32, F16),
        (F32, F64),
        (F64, F32),
    ]
};

/// Pairs reachable through the intermediate: (source, destination, second-hop destination)
const SPECIAL_PAIRS: &[(DType, DType, DType)] = {
    use DType::*;
    &[
        (Bool, I64, I64),
        (I16, I64, I64),
        (I8, I64, I64),
        (U8, Bool, Bool),
        (I16, Bool, Bool),
        (I64, Bool, Bool),
        (I8, Bool, Bool),
        (I64, I8, I8),
    ]
};

static DIRECT_TABLE: CastTable = build_table(DIRECT_PAIRS);
static SPECIAL_TABLE: CastTable = build_special_table(SPECIAL_PAIRS);

/// Native op for the pair, if the cast unit has one
#[inline]
pub fn direct_cast_op(src: DType, dst: DType) -> Option<CastOp> {
    DIRECT_TABLE[src.index()][dst.index()]
}

/// Second-hop op for a special pair
#[inline]
pub fn special_cast_op(src: DType, dst: DType) -> Option<CastOp> {
    SPECIAL_TABLE[src.index()][dst.index()]
}

/// Whether `resolve(src, dst)` succeeds
#[inline]
pub fn can_cast(src: DType, dst: DType) -> bool {
    resolve(src, dst).is_ok()
}

/// Resolve the conversion path for a dtype pair
///
/// A direct op wins over a special pair. Pairs in neither table fail with
/// [`Error::UnsupportedCast`]; no host-side conversion is attempted.
pub fn resolve(src: DType, dst: DType) -> Result<CastPlan> {
    if let Some(op) = direct_cast_op(src, dst) {
        return Ok(CastPlan::Direct(op));
    }

    if let Some(second) = special_cast_op(src, dst) {
        let first = direct_cast_op(src, INTERMEDIATE_DTYPE)
            .ok_or_else(|| Error::unsupported_cast(src, INTERMEDIATE_DTYPE))?;
        return Ok(CastPlan::TwoHop {
            intermediate: INTERMEDIATE_DTYPE,
            first,
            second,
        });
    }

    Err(Error::unsupported_cast(src, dst))
}
