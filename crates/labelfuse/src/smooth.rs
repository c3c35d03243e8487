//! Separable Gaussian smoothing of n-dimensional float arrays.
//!
//! The kernel is sampled at integer offsets, truncated at `4 * sigma`, and
//! normalized to unit sum. Samples past the array edge are taken from the
//! half-sample symmetric reflection (`d c b a | a b c d | d c b a`), so a
//! constant array is left unchanged and outputs stay within the input range.

use ndarray::{ArrayViewMutD, Axis};

use crate::volume::{validate_sigma, CombineError};

const TRUNCATE: f64 = 4.0;

/// Beyond this many reflection periods of radius, the folded kernel is
/// uniform to well below `f64` precision.
const FLAT_RADIUS_PERIODS: usize = 64;

/// Normalized Gaussian taps `(offset, weight)` for a lane of `len` samples.
///
/// Reflection repeats every `2 * len` samples, so a kernel wider than one
/// period is folded onto offsets `0..2 * len` without changing the result.
pub(crate) fn lane_taps(sigma: f32, len: usize) -> Vec<(isize, f64)> {
    let sigma = sigma as f64;
    let period = 2 * len.max(1);
    let radius = (TRUNCATE * sigma + 0.5).floor();
    if radius > (FLAT_RADIUS_PERIODS * period) as f64 {
        let w = 1.0 / period as f64;
        return (0..period as isize).map(|m| (m, w)).collect();
    }
    let radius = radius as isize;
    let weight = |k: isize| {
        let x = k as f64 / sigma;
        (-0.5 * x * x).exp()
    };

    let mut taps: Vec<(isize, f64)> = if (2 * radius + 1) as usize <= period {
        (-radius..=radius).map(|k| (k, weight(k))).collect()
    } else {
        let mut folded: Vec<(isize, f64)> = (0..period as isize).map(|m| (m, 0.0)).collect();
        for k in -radius..=radius {
            folded[k.rem_euclid(period as isize) as usize].1 += weight(k);
        }
        folded
    };
    let sum: f64 = taps.iter().map(|&(_, w)| w).sum();
    for (_, w) in &mut taps {
        *w /= sum;
    }
    taps
}

#[inline]
fn reflect_index(i: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let m = i.rem_euclid(period);
    if m >= len as isize {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

fn convolve_lane(src: &[f32], taps: &[(isize, f64)], dst: &mut [f32]) {
    let len = src.len();
    for (i, out) in dst.iter_mut().enumerate() {
        let mut acc = 0.0f64;
        for &(offset, w) in taps {
            acc += w * src[reflect_index(i as isize + offset, len)] as f64;
        }
        *out = acc as f32;
    }
}

/// Smooth `data` in place along every axis with an isotropic Gaussian of
/// standard deviation `sigma`. `sigma == 0` leaves the data untouched.
///
/// Fails with [`CombineError::InvalidSigma`] when `sigma` is negative or not
/// finite.
pub fn gaussian_smooth(
    data: &mut ArrayViewMutD<'_, f32>,
    sigma: f32,
) -> Result<(), CombineError> {
    validate_sigma(sigma)?;
    if sigma == 0.0 || data.is_empty() {
        return Ok(());
    }
    let mut src = Vec::new();
    let mut dst = Vec::new();
    for axis in 0..data.ndim() {
        let taps = lane_taps(sigma, data.len_of(Axis(axis)));
        if taps.len() == 1 {
            continue;
        }
        for mut lane in data.lanes_mut(Axis(axis)) {
            src.clear();
            src.extend(lane.iter().copied());
            dst.resize(src.len(), 0.0);
            convolve_lane(&src, &taps, &mut dst);
            for (v, &s) in lane.iter_mut().zip(&dst) {
                *v = s;
            }
        }
    }
    Ok(())
}
