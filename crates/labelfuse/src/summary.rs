use ndarray::Axis;

use crate::config::CombineConfig;
use crate::CombinedMaps;

/// Statistics of one combination run, for reports and sanity checks.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CombineSummary {
    /// Shape of the input volumes and output maps.
    pub shape: Vec<usize>,
    /// Number of hypotheses combined.
    pub n_hypotheses: usize,
    /// Configuration the maps were produced with.
    pub config: CombineConfig,
    /// Foreground voxel count of the detection map, per frame.
    pub foreground_voxels_per_frame: Vec<usize>,
    /// Fraction of all voxels marked foreground.
    pub foreground_fraction: f64,
    /// Mean contour value over all voxels.
    pub contour_mean: f64,
    /// Largest contour value.
    pub contour_max: f32,
}

impl CombineSummary {
    /// Summarize `maps`. With `has_time_axis`, axis 0 is split into frames;
    /// otherwise the whole map counts as a single frame.
    pub fn from_maps(
        maps: &CombinedMaps,
        n_hypotheses: usize,
        config: &CombineConfig,
        has_time_axis: bool,
    ) -> Self {
        let foreground_voxels_per_frame = if has_time_axis && maps.detection.ndim() > 0 {
            maps.detection
                .axis_iter(Axis(0))
                .map(|frame| frame.iter().filter(|&&v| v > 0.0).count())
                .collect()
        } else {
            vec![maps.detection.iter().filter(|&&v| v > 0.0).count()]
        };

        let n_voxels = maps.detection.len();
        let total_fg: usize = foreground_voxels_per_frame.iter().sum();
        let (foreground_fraction, contour_mean) = if n_voxels == 0 {
            (0.0, 0.0)
        } else {
            let contour_sum: f64 = maps.contours.iter().map(|&v| v as f64).sum();
            (
                total_fg as f64 / n_voxels as f64,
                contour_sum / n_voxels as f64,
            )
        };
        let contour_max = maps.contours.iter().copied().fold(0.0f32, f32::max);

        Self {
            shape: maps.detection.shape().to_vec(),
            n_hypotheses,
            config: *config,
            foreground_voxels_per_frame,
            foreground_fraction,
            contour_mean,
            contour_max,
        }
    }
}
