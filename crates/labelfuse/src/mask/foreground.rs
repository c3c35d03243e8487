use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Zip};

use crate::volume::LabelValue;

/// Binary foreground mask: `1` where the label is non-zero.
pub fn foreground_mask<L: LabelValue>(labels: &ArrayViewD<'_, L>) -> ArrayD<u8> {
    labels.mapv(|l| u8::from(!l.is_background()))
}

/// Raise `detection` to `1.0` wherever `labels` is foreground.
///
/// Applied once per hypothesis this yields the elementwise maximum of the
/// binarized masks. Shapes must already agree.
pub(crate) fn max_foreground_into<L: LabelValue>(
    labels: &ArrayViewD<'_, L>,
    detection: &mut ArrayViewMutD<'_, f32>,
) {
    Zip::from(detection).and(labels).for_each(|d, &l| {
        if !l.is_background() {
            *d = 1.0;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn binarizes_any_positive_label() {
        let labels = array![[0u16, 3, 0], [7, 0, 1]].into_dyn();
        let mask = foreground_mask(&labels.view());
        assert_eq!(mask, array![[0u8, 1, 0], [1, 0, 1]].into_dyn());
    }

    #[test]
    fn accumulation_is_a_union() {
        let a = array![[1u32, 0], [0, 0]].into_dyn();
        let b = array![[0u32, 0], [0, 9]].into_dyn();
        let mut det = Array2::<f32>::zeros((2, 2)).into_dyn();
        max_foreground_into(&a.view(), &mut det.view_mut());
        max_foreground_into(&b.view(), &mut det.view_mut());
        assert_eq!(det, array![[1.0f32, 0.0], [0.0, 1.0]].into_dyn());
    }
}
