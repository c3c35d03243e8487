//! Label element types, input validation, and the combiner error type.

use ndarray::ArrayViewD;

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors returned by label-set combination.
#[derive(Debug, Clone, PartialEq)]
pub enum CombineError {
    /// No label volumes were supplied.
    EmptyInput,
    /// A label volume does not share the shape of the first one.
    ShapeMismatch {
        /// Position of the offending volume in the input sequence.
        index: usize,
        /// Shape of the first volume.
        expected: Vec<usize>,
        /// Shape of the offending volume.
        found: Vec<usize>,
    },
    /// Smoothing scale is negative or not finite.
    InvalidSigma(f32),
    /// Input has no spatial axis to look for boundaries along.
    MissingSpatialAxes {
        /// Number of axes of the input.
        ndim: usize,
    },
}

impl std::fmt::Display for CombineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no label volumes supplied"),
            Self::ShapeMismatch {
                index,
                expected,
                found,
            } => write!(
                f,
                "shape mismatch: volume {} has shape {:?}, expected {:?}",
                index, found, expected
            ),
            Self::InvalidSigma(sigma) => {
                write!(f, "invalid sigma {}: must be finite and >= 0", sigma)
            }
            Self::MissingSpatialAxes { ndim } => {
                write!(f, "input with {} axes has no spatial axis", ndim)
            }
        }
    }
}

impl std::error::Error for CombineError {}

// ── Label element types ────────────────────────────────────────────────────

/// Integer element type of a label volume.
///
/// `0` is background; any other value identifies one object instance.
pub trait LabelValue: Copy + PartialEq + Send + Sync + 'static {
    /// Returns `true` for background voxels.
    fn is_background(self) -> bool;
}

macro_rules! impl_label_value {
    ($($t:ty),*) => {
        $(
            impl LabelValue for $t {
                #[inline]
                fn is_background(self) -> bool {
                    self == 0
                }
            }
        )*
    };
}

impl_label_value!(u8, u16, u32, u64, usize);

// ── Validation ─────────────────────────────────────────────────────────────

/// Check that `sigma` is usable as a Gaussian scale.
pub(crate) fn validate_sigma(sigma: f32) -> Result<(), CombineError> {
    if sigma.is_finite() && sigma >= 0.0 {
        Ok(())
    } else {
        Err(CombineError::InvalidSigma(sigma))
    }
}

/// Check that the hypothesis set is non-empty, shape-consistent, and has at
/// least `min_ndim` axes. Returns the common shape.
pub(crate) fn validate_volumes<L: LabelValue>(
    volumes: &[ArrayViewD<'_, L>],
    min_ndim: usize,
) -> Result<Vec<usize>, CombineError> {
    let first = volumes.first().ok_or(CombineError::EmptyInput)?;
    let expected = first.shape().to_vec();
    for (index, v) in volumes.iter().enumerate().skip(1) {
        if v.shape() != expected.as_slice() {
            return Err(CombineError::ShapeMismatch {
                index,
                expected,
                found: v.shape().to_vec(),
            });
        }
    }
    if expected.len() < min_ndim {
        return Err(CombineError::MissingSpatialAxes {
            ndim: expected.len(),
        });
    }
    Ok(expected)
}
