//! Frame-major combination: every hypothesis's frame `t` is fused before
//! moving on to frame `t + 1`, so per-hypothesis masks only ever exist for one
//! frame at a time.

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Axis, IxDyn, Zip};

use crate::config::{CombineConfig, ContourNormalization};
use crate::mask::{mark_boundaries, max_foreground_into};
use crate::smooth::gaussian_smooth;
use crate::volume::{validate_volumes, CombineError, LabelValue};
use crate::CombinedMaps;

/// Reusable per-frame buffers.
struct FrameScratch {
    /// Boundary mask of the hypothesis currently being processed.
    mask: ArrayD<u8>,
    /// Number of hypotheses marking each voxel as boundary.
    counts: ArrayD<u32>,
}

impl FrameScratch {
    fn new(frame_shape: &[usize]) -> Self {
        Self {
            mask: ArrayD::zeros(IxDyn(frame_shape)),
            counts: ArrayD::zeros(IxDyn(frame_shape)),
        }
    }
}

/// Fuse one frame from every hypothesis into the output frames.
///
/// `detection` must be zero on entry. Boundary masks are summed as integer
/// counts and divided once, which makes the result independent of hypothesis
/// order. Smoothing the mean equals the mean of the smoothed masks because
/// the kernel is linear and shared.
fn fuse_frame<L: LabelValue>(
    frames: &[ArrayViewD<'_, L>],
    config: &CombineConfig,
    mut detection: ArrayViewMutD<'_, f32>,
    mut contours: ArrayViewMutD<'_, f32>,
    scratch: &mut FrameScratch,
) -> Result<(), CombineError> {
    scratch.counts.fill(0);
    for frame in frames {
        max_foreground_into(frame, &mut detection);

        scratch.mask.fill(0);
        mark_boundaries(
            frame,
            config.connectivity,
            config.boundary_mode,
            &mut scratch.mask.view_mut(),
        );
        Zip::from(&mut scratch.counts)
            .and(&scratch.mask)
            .for_each(|c, &m| *c += m as u32);
    }

    let n = frames.len() as f32;
    Zip::from(&mut contours)
        .and(&scratch.counts)
        .for_each(|v, &c| *v = c as f32 / n);

    if config.sigma > 0.0 {
        gaussian_smooth(&mut contours, config.sigma)?;
        // normalized-kernel rounding can land a hair outside [0, 1]
        contours.mapv_inplace(|v| v.clamp(0.0, 1.0));
    }

    if config.contour_normalization == ContourNormalization::FrameMax {
        let max = contours.iter().copied().fold(0.0f32, f32::max);
        if max > 0.0 {
            contours.mapv_inplace(|v| v / max);
        }
    }
    Ok(())
}

/// Combine label volumes whose axis 0 is time.
pub(crate) fn combine_volumes<L: LabelValue>(
    volumes: &[ArrayViewD<'_, L>],
    config: &CombineConfig,
) -> Result<CombinedMaps, CombineError> {
    config.validate()?;
    let shape = validate_volumes(volumes, 2)?;
    tracing::debug!(
        "combining {} hypotheses of shape {:?} (sigma={}, {:?}, {:?})",
        volumes.len(),
        shape,
        config.sigma,
        config.connectivity,
        config.boundary_mode,
    );

    let mut maps = CombinedMaps::zeros(&shape);
    let mut scratch = FrameScratch::new(&shape[1..]);
    let mut frames = Vec::with_capacity(volumes.len());
    for t in 0..shape[0] {
        frames.clear();
        frames.extend(volumes.iter().map(|v| v.index_axis(Axis(0), t)));
        fuse_frame(
            &frames,
            config,
            maps.detection.index_axis_mut(Axis(0), t),
            maps.contours.index_axis_mut(Axis(0), t),
            &mut scratch,
        )?;
        tracing::trace!("frame {}/{} fused", t + 1, shape[0]);
    }
    Ok(maps)
}

/// Combine label frames that carry no time axis.
pub(crate) fn combine_frames<L: LabelValue>(
    frames: &[ArrayViewD<'_, L>],
    config: &CombineConfig,
) -> Result<CombinedMaps, CombineError> {
    config.validate()?;
    let shape = validate_volumes(frames, 1)?;
    tracing::debug!(
        "combining {} frame hypotheses of shape {:?} (sigma={})",
        frames.len(),
        shape,
        config.sigma,
    );

    let mut maps = CombinedMaps::zeros(&shape);
    let mut scratch = FrameScratch::new(&shape);
    fuse_frame(
        frames,
        config,
        maps.detection.view_mut(),
        maps.contours.view_mut(),
        &mut scratch,
    )?;
    Ok(maps)
}
