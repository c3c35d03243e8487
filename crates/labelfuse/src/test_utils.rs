//! Synthetic label fixtures for unit tests.

use ndarray::{stack, Array2, Array3, ArrayD, ArrayViewD, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `h x w` frame with a `size x size` square of `label` whose top-left corner
/// is at `(row, col)`. The square is clipped to the frame.
pub(crate) fn square_frame(
    h: usize,
    w: usize,
    row: usize,
    col: usize,
    size: usize,
    label: u16,
) -> ArrayD<u16> {
    let mut frame = Array2::<u16>::zeros((h, w));
    for r in row..(row + size).min(h) {
        for c in col..(col + size).min(w) {
            frame[[r, c]] = label;
        }
    }
    frame.into_dyn()
}

/// Stack equally shaped frames along a new leading time axis.
pub(crate) fn stack_frames(frames: &[ArrayViewD<'_, u16>]) -> ArrayD<u16> {
    stack(Axis(0), frames).expect("frames share one shape")
}

/// `(t, h, w)` volume of random disks with labels `1..=n_blobs` per frame.
///
/// Later disks overwrite earlier ones, so neighboring objects may touch.
pub(crate) fn random_blob_volume(
    t: usize,
    h: usize,
    w: usize,
    n_blobs: u16,
    seed: u64,
) -> ArrayD<u16> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vol = Array3::<u16>::zeros((t, h, w));
    let r_max = (h.min(w) as f32 / 6.0).max(1.5);
    for ti in 0..t {
        for label in 1..=n_blobs {
            let cy = rng.gen_range(0.0..h as f32);
            let cx = rng.gen_range(0.0..w as f32);
            let radius = rng.gen_range(1.0..r_max);
            for y in 0..h {
                for x in 0..w {
                    let dy = y as f32 - cy;
                    let dx = x as f32 - cx;
                    if dx * dx + dy * dy <= radius * radius {
                        vol[[ti, y, x]] = label;
                    }
                }
            }
        }
    }
    vol.into_dyn()
}
