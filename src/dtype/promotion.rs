//! Promotion rules for operator operands
//!
//! An operator kernel is only implemented for a bounded set of dtypes. The
//! target for a group of operands is chosen in two steps: the "natural" joint
//! type inferred from the operand categories, then, if the operator cannot
//! take it, the first dtype of [`PROMOTION_PRECEDENCE`] the operator supports.

use super::{DType, DTypeSet};
use crate::error::{Error, Result};

/// Fallback search order, highest precedence first
pub const PROMOTION_PRECEDENCE: [DType; 6] = [
    DType::F32,
    DType::F16,
    DType::I32,
    DType::I16,
    DType::I8,
    DType::Bool,
];

/// Category membership tests, evaluated in order; first match wins
const CATEGORIES: [(DTypeSet, DType); 6] = [
    (DTypeSet::of(&[DType::F64, DType::F32]), DType::F32),
    (DTypeSet::single(DType::F16), DType::F16),
    (
        DTypeSet::of(&[DType::I64, DType::I32, DType::U64, DType::U32]),
        DType::I32,
    ),
    (DTypeSet::of(&[DType::I16, DType::U16]), DType::I16),
    (DTypeSet::of(&[DType::I8, DType::U8]), DType::I8),
    (DTypeSet::single(DType::Bool), DType::Bool),
];

/// Natural joint target for the dtypes present among operands
///
/// Returns `None` when no operand dtype falls into a category, which is
/// only the case for an empty set.
pub fn natural_target(present: DTypeSet) -> Option<DType> {
    CATEGORIES
        .iter()
        .find(|(members, _)| present.intersects(*members))
        .map(|&(_, target)| target)
}

/// First dtype of the precedence list the operator supports
pub fn fallback_target(supported: DTypeSet) -> Result<DType> {
    PROMOTION_PRECEDENCE
        .into_iter()
        .find(|&dt| supported.contains(dt))
        .ok_or(Error::UnsupportedOperatorDTypes { supported })
}

/// Final promotion target for a group of operands
///
/// The natural target wins when the operator supports it; otherwise the
/// precedence list decides.
pub fn promotion_target(present: DTypeSet, supported: DTypeSet) -> Result<DType> {
    let candidate = natural_target(present).ok_or(Error::UncastableDTypes { present })?;
    if supported.contains(candidate) {
        Ok(candidate)
    } else {
        fallback_target(supported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DType::*;

    #[test]
    fn test_natural_target_categories() {
        assert_eq!(natural_target(DTypeSet::of(&[F64, I8])), Some(F32));
        assert_eq!(natural_target(DTypeSet::of(&[F16, I64])), Some(F16));
        assert_eq!(natural_target(DTypeSet::of(&[U64, Bool])), Some(I32));
        assert_eq!(natural_target(DTypeSet::of(&[U16, U8])), Some(I16));
        assert_eq!(natural_target(DTypeSet::of(&[U8, Bool])), Some(I8));
        assert_eq!(natural_target(DTypeSet::single(Bool)), Some(Bool));
        assert_eq!(natural_target(DTypeSet::EMPTY), None);
    }

    #[test]
    fn test_every_dtype_is_recognized() {
        for dt in DType::ALL {
            assert!(natural_target(DTypeSet::single(dt)).is_some(), "{dt}");
        }
    }

    #[test]
    fn test_supported_candidate_wins() {
        let supported = DTypeSet::of(&[F16, F32]);
        assert_eq!(promotion_target(DTypeSet::of(&[F32, I32]), supported), Ok(F32));
    }

    #[test]
    fn test_fallback_follows_precedence() {
        let supported = DTypeSet::of(&[I16, I8]);
        assert_eq!(promotion_target(DTypeSet::single(I64), supported), Ok(I16));

        // f16 inputs on an integer-only operator
        let supported = DTypeSet::of(&[Bool, I32]);
        assert_eq!(promotion_target(DTypeSet::single(F16), supported), Ok(I32));
    }

    #[test]
    fn test_no_precedence_member_supported() {
        let err = promotion_target(DTypeSet::single(U16), DTypeSet::EMPTY).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperatorDTypes { .. }));

        // u8/f64 alone are outside the precedence list
        let err = promotion_target(DTypeSet::single(I64), DTypeSet::of(&[U8, F64])).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedOperatorDTypes {
                supported: DTypeSet::of(&[U8, F64])
            }
        );
    }

    #[test]
    fn test_empty_operands_are_uncastable() {
        let err = promotion_target(DTypeSet::EMPTY, DTypeSet::FLOATS).unwrap_err();
        assert_eq!(
            err,
            Error::UncastableDTypes {
                present: DTypeSet::EMPTY
            }
        );
    }

    #[test]
    fn test_target_is_always_supported() {
        let supported_sets = [
            DTypeSet::of(&[F32]),
            DTypeSet::of(&[Bool]),
            DTypeSet::of(&[I8, U8]),
            DTypeSet::of(&[F16, I16]),
            DTypeSet::of(&[I32, F64]),
        ];
        for supported in supported_sets {
            for dt in DType::ALL {
                let target = promotion_target(DTypeSet::single(dt), supported).unwrap();
                assert!(supported.contains(target), "{dt} -> {target}");
            }
        }
    }
}
