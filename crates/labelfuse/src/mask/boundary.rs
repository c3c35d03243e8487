use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, AxisDescription, Slice, Zip};

use crate::config::{BoundaryMode, Connectivity};
use crate::volume::LabelValue;

/// Binary boundary mask of one label frame.
///
/// A voxel is marked when its label differs from at least one in-bounds
/// neighbor under `connectivity`. With [`BoundaryMode::Inner`] only labeled
/// voxels are marked; with [`BoundaryMode::Thick`] background voxels touching
/// an object are marked as well. Every axis of `labels` is treated as spatial.
pub fn boundary_mask<L: LabelValue>(
    labels: &ArrayViewD<'_, L>,
    connectivity: Connectivity,
    mode: BoundaryMode,
) -> ArrayD<u8> {
    let mut mask = ArrayD::<u8>::zeros(labels.raw_dim());
    mark_boundaries(labels, connectivity, mode, &mut mask.view_mut());
    mask
}

/// Set `mask` to `1` at boundary voxels of `labels`. Existing `1`s are kept.
pub(crate) fn mark_boundaries<L: LabelValue>(
    labels: &ArrayViewD<'_, L>,
    connectivity: Connectivity,
    mode: BoundaryMode,
    mask: &mut ArrayViewMutD<'_, u8>,
) {
    let shape = labels.shape();
    for offset in neighbor_offsets(labels.ndim(), connectivity) {
        // No neighbor exists along an axis of length < 2.
        if offset.iter().zip(shape).any(|(&o, &n)| o != 0 && n < 2) {
            continue;
        }
        let here = labels.slice_each_axis(|ax| overlap(&offset, ax, false));
        let there = labels.slice_each_axis(|ax| overlap(&offset, ax, true));
        let marked = mask.slice_each_axis_mut(|ax| overlap(&offset, ax, false));

        match mode {
            BoundaryMode::Inner => {
                Zip::from(marked)
                    .and(&here)
                    .and(&there)
                    .for_each(|m, &a, &b| {
                        if a != b && !a.is_background() {
                            *m = 1;
                        }
                    });
            }
            BoundaryMode::Thick => {
                Zip::from(marked)
                    .and(&here)
                    .and(&there)
                    .for_each(|m, &a, &b| {
                        if a != b {
                            *m = 1;
                        }
                    });
            }
        }
    }
}

/// Range along one axis covering voxels (or, with `neighbor`, their
/// neighbors) for which the neighbor at `offset` is in bounds.
fn overlap(offset: &[i8], ax: AxisDescription, neighbor: bool) -> Slice {
    let len = ax.len as isize;
    let o = offset[ax.axis.index()] as isize;
    let start = if neighbor { o.max(0) } else { (-o).max(0) };
    let end = len - if neighbor { (-o).max(0) } else { o.max(0) };
    Slice::from(start..end)
}

/// All non-zero steps in `{-1, 0, 1}^ndim` admitted by `connectivity`.
pub(crate) fn neighbor_offsets(ndim: usize, connectivity: Connectivity) -> Vec<Vec<i8>> {
    match connectivity {
        Connectivity::Face => (0..ndim)
            .flat_map(|axis| {
                [-1i8, 1].into_iter().map(move |step| {
                    let mut o = vec![0i8; ndim];
                    o[axis] = step;
                    o
                })
            })
            .collect(),
        Connectivity::Full => {
            let total = 3usize.pow(ndim as u32);
            (0..total)
                .map(|mut code| {
                    let mut o = vec![0i8; ndim];
                    for v in o.iter_mut() {
                        *v = (code % 3) as i8 - 1;
                        code /= 3;
                    }
                    o
                })
                .filter(|o| o.iter().any(|&v| v != 0))
                .collect()
        }
    }
}
