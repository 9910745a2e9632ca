//! Layout: shape and strides, and stride synthesis for memory formats

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Most tensors have 5 or fewer dimensions (NCDHW), so we stack-allocate up to 5
const STACK_DIMS: usize = 5;

/// Shape type: extents of a tensor, `-1` marks a degenerate dimension
pub type Shape = SmallVec<[i64; STACK_DIMS]>;

/// Strides type: element offsets between consecutive elements along each dimension
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[i64; STACK_DIMS]>;

/// Stride value produced once a degenerate extent has been crossed
pub const DEGENERATE_STRIDE: i64 = -1;

/// Physical element order requested for a new tensor
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MemoryFormat {
    /// Row-major, last dimension fastest
    #[default]
    Contiguous,
    /// Channel-interleaved rank-4 (NHWC order for NCHW extents)
    ChannelsLast,
    /// Channel-interleaved rank-5 (NDHWC order for NCDHW extents)
    ChannelsLast3d,
    /// Keep the source tensor's strides
    Preserve,
}

impl MemoryFormat {
    /// Dimensions from fastest to slowest varying, or `None` for `Preserve`
    fn traversal(self, ndim: usize) -> Result<Option<SmallVec<[usize; STACK_DIMS]>>> {
        match self {
            Self::Contiguous => Ok(Some((0..ndim).rev().collect())),
            Self::ChannelsLast => {
                require_rank("ChannelsLast", ndim, 4)?;
                Ok(Some(SmallVec::from_slice(&[1, 3, 2, 0])))
            }
            Self::ChannelsLast3d => {
                require_rank("ChannelsLast3d", ndim, 5)?;
                Ok(Some(SmallVec::from_slice(&[1, 4, 3, 2, 0])))
            }
            Self::Preserve => Ok(None),
        }
    }
}

fn require_rank(format: &str, ndim: usize, rank: usize) -> Result<()> {
    if ndim == rank {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            "format",
            format!("{format} requires a rank-{rank} tensor, got rank {ndim}"),
        ))
    }
}

/// Strides realizing `format` for `shape`
///
/// Dimensions are visited from fastest to slowest; each receives the running
/// product of the extents visited before it. Zero extents get the current
/// stride without changing the product, and a `-1` extent turns the product
/// into [`DEGENERATE_STRIDE`] for every slower dimension.
///
/// `Preserve` has no strides of its own; use [`Layout::with_format`].
/// Fails when the running product overflows `i64`.
///
/// # Example
/// ```
/// use dcast::tensor::{MemoryFormat, format_strides};
/// let strides = format_strides(&[2, 3, 4, 5], MemoryFormat::ChannelsLast).unwrap();
/// assert_eq!(strides.as_slice(), &[60, 1, 15, 3]);
/// ```
pub fn format_strides(shape: &[i64], format: MemoryFormat) -> Result<Strides> {
    let order = format.traversal(shape.len())?.ok_or_else(|| {
        Error::invalid_argument("format", "Preserve needs the source strides")
    })?;

    accumulate_strides(shape, order)
}

fn accumulate_strides(shape: &[i64], order: impl IntoIterator<Item = usize>) -> Result<Strides> {
    let mut strides: Strides = SmallVec::from_elem(0, shape.len());
    let mut stride = 1i64;
    for dim in order {
        strides[dim] = stride;
        let extent = shape[dim];
        if extent == 0 {
            continue;
        }
        if extent == -1 {
            stride = DEGENERATE_STRIDE;
        }
        if stride != DEGENERATE_STRIDE {
            stride = stride
                .checked_mul(extent)
                .ok_or_else(|| overflow(shape, "element count"))?;
        }
    }
    Ok(strides)
}

fn overflow(shape: &[i64], what: &str) -> Error {
    Error::invalid_argument("shape", format!("{what} of {shape:?} overflows"))
}

/// Layout describes how a tensor's elements sit in its allocation
///
/// Address of element at indices [i0, i1, ..., in]:
///   i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    /// Shape: extent along each dimension
    shape: Shape,
    /// Strides: offset (in elements) between consecutive elements along each dimension
    strides: Strides,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// Fails when the element count overflows `i64`.
    ///
    /// # Example
    /// ```
    /// use dcast::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]).unwrap();
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[i64]) -> Result<Self> {
        Ok(Self {
            shape: shape.iter().copied().collect(),
            strides: accumulate_strides(shape, (0..shape.len()).rev())?,
        })
    }

    /// Create a layout with explicit shape and strides
    pub fn new(shape: &[i64], strides: &[i64]) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(Error::invalid_argument(
                "strides",
                format!(
                    "shape rank {} does not match strides rank {}",
                    shape.len(),
                    strides.len()
                ),
            ));
        }
        Ok(Self {
            shape: shape.iter().copied().collect(),
            strides: strides.iter().copied().collect(),
        })
    }

    /// Create a scalar (0-dimensional) layout
    pub fn scalar() -> Self {
        Self {
            shape: SmallVec::new(),
            strides: SmallVec::new(),
        }
    }

    /// Same shape, strides realizing `format`
    pub fn with_format(&self, format: MemoryFormat) -> Result<Self> {
        if format == MemoryFormat::Preserve {
            return Ok(self.clone());
        }
        Ok(Self {
            shape: self.shape.clone(),
            strides: format_strides(&self.shape, format)?,
        })
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[i64] {
        &self.strides
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements; zero when any extent is zero or degenerate
    pub fn elem_count(&self) -> Result<usize> {
        if self.shape.iter().any(|&extent| extent <= 0) {
            return Ok(0);
        }
        self.shape
            .iter()
            .try_fold(1usize, |count, &extent| {
                count.checked_mul(usize::try_from(extent).ok()?)
            })
            .ok_or_else(|| overflow(&self.shape, "element count"))
    }

    /// Number of elements the allocation must hold to back every index
    pub fn storage_len(&self) -> Result<usize> {
        if self.shape.iter().any(|&extent| extent <= 0) {
            return Ok(0);
        }
        self.shape
            .iter()
            .zip(self.strides.iter())
            .try_fold(1usize, |len, (&extent, &stride)| {
                let last = usize::try_from(extent - 1).ok()?;
                let step = usize::try_from(stride.unsigned_abs()).ok()?;
                len.checked_add(last.checked_mul(step)?)
            })
            .ok_or_else(|| overflow(&self.shape, "storage size"))
    }

    /// Check if the tensor is a scalar (0 dimensions)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Check if memory is contiguous (row-major order)
    pub fn is_contiguous(&self) -> bool {
        accumulate_strides(&self.shape, (0..self.ndim()).rev())
            .is_ok_and(|strides| strides == self.strides)
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?} }}",
            self.shape.as_slice(),
            self.strides.as_slice()
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}
