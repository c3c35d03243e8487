//! labelfuse: combine segmentation hypotheses into tracking evidence maps.
//!
//! A cell-tracking workflow often segments the same image sequence several
//! times (one run per preprocessing parameter, model, or threshold). This
//! crate merges those integer label volumes into the two floating-point maps
//! a multi-hypothesis tracker consumes:
//!
//! 1. **Detection** – elementwise maximum of the binarized foreground masks.
//!    Any hypothesis claiming a voxel as foreground keeps it.
//! 2. **Contours** – per-hypothesis label-transition masks, averaged across
//!    hypotheses and optionally Gaussian-smoothed along spatial axes.
//!
//! Volumes are laid out `(T, ...spatial)`. Frames are processed one at a
//! time; smoothing and neighbor lookups never cross the time axis.
//!
//! # Public API
//! - [`Combiner`], [`combine`] and [`combine_frame`] as entry points
//! - [`CombineConfig`] for neighborhood, boundary side and normalization
//! - [`CombineSummary`] for run statistics
//! - single-hypothesis helpers [`foreground_mask`], [`boundary_mask`] and
//!   [`gaussian_smooth`]

mod combiner;
mod config;
mod mask;
mod pipeline;
mod smooth;
mod summary;
#[cfg(test)]
mod test_utils;
mod volume;

use ndarray::{ArrayD, ArrayViewD, IxDyn};

pub use combiner::Combiner;
pub use config::{BoundaryMode, CombineConfig, Connectivity, ContourNormalization};
pub use mask::{boundary_mask, foreground_mask};
pub use smooth::gaussian_smooth;
pub use summary::CombineSummary;
pub use volume::{CombineError, LabelValue};

/// Detection and contour maps produced from one hypothesis set.
///
/// Both arrays have exactly the shape of the input volumes.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedMaps {
    /// Foreground evidence in `{0, 1}`.
    pub detection: ArrayD<f32>,
    /// Boundary confidence in `[0, 1]`.
    pub contours: ArrayD<f32>,
}

impl CombinedMaps {
    /// All-zero maps of the given shape.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            detection: ArrayD::zeros(IxDyn(shape)),
            contours: ArrayD::zeros(IxDyn(shape)),
        }
    }

    /// Shape shared by both maps.
    pub fn shape(&self) -> &[usize] {
        self.detection.shape()
    }
}

/// Combine label volumes of shape `(T, ...spatial)` with default
/// neighborhood settings and spatial smoothing scale `sigma` (`0` disables).
///
/// Fails on an empty set, mismatched shapes, fewer than two axes, or an
/// invalid `sigma`.
pub fn combine<L: LabelValue>(
    volumes: &[ArrayViewD<'_, L>],
    sigma: f32,
) -> Result<CombinedMaps, CombineError> {
    Combiner::new(sigma).combine(volumes)
}

/// Like [`combine`], for inputs without a time axis.
pub fn combine_frame<L: LabelValue>(
    frames: &[ArrayViewD<'_, L>],
    sigma: f32,
) -> Result<CombinedMaps, CombineError> {
    Combiner::new(sigma).combine_frame(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    #[test]
    fn volume_entry_point_treats_axis_zero_as_time() {
        // Each row is its own 1-D frame, so there are no vertical transitions.
        let a = array![[1u16, 1, 0, 0], [0, 0, 0, 0]].into_dyn();
        let maps = combine(&[a.view()], 0.0).unwrap();
        assert_eq!(
            maps.contours,
            array![[0.0f32, 1.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0]].into_dyn()
        );

        let flat = combine_frame(&[a.view()], 0.0).unwrap();
        assert_eq!(flat.contours[[0, 0]], 1.0);
        assert_eq!(flat.contours[[0, 1]], 1.0);
    }

    #[test]
    fn one_axis_volume_has_no_spatial_axis() {
        let a = array![0u8, 1, 1].into_dyn();
        assert_eq!(
            combine(&[a.view()], 0.0).unwrap_err(),
            CombineError::MissingSpatialAxes { ndim: 1 }
        );
        assert!(combine_frame(&[a.view()], 0.0).is_ok());
    }

    #[test]
    fn zero_dimensional_frame_is_rejected() {
        let a = ndarray::arr0(3u32).into_dyn();
        assert_eq!(
            combine_frame(&[a.view()], 0.0).unwrap_err(),
            CombineError::MissingSpatialAxes { ndim: 0 }
        );
    }

    #[test]
    fn single_frame_volume_matches_frame_entry_point() {
        let frame = crate::test_utils::square_frame(4, 4, 0, 0, 2, 1);
        let vol = frame.clone().insert_axis(Axis(0));
        let by_frame = combine_frame(&[frame.view()], 0.7).unwrap();
        let by_volume = combine(&[vol.view()], 0.7).unwrap();
        assert_eq!(by_volume.contours.index_axis(Axis(0), 0), by_frame.contours);
        assert_eq!(by_volume.detection.index_axis(Axis(0), 0), by_frame.detection);
    }
}
