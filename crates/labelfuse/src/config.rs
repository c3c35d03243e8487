use std::path::Path;

use crate::volume::{validate_sigma, CombineError};

/// Neighborhood used to decide whether a voxel sits on a label transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// One step along a single spatial axis (4-neighborhood in 2-D,
    /// 6-neighborhood in 3-D).
    #[default]
    Face,
    /// Any combination of steps across spatial axes (8-neighborhood in 2-D,
    /// 26-neighborhood in 3-D).
    Full,
}

/// Which side of a label transition is marked as boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Only labeled voxels are marked; background never carries a contour.
    #[default]
    Inner,
    /// Both sides of every transition are marked, including background voxels
    /// that touch an object.
    Thick,
}

/// Post-processing applied to each frame of the contour map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourNormalization {
    /// Keep the averaged, smoothed response as is.
    #[default]
    None,
    /// Rescale every frame so its largest contour value is 1.
    FrameMax,
}

/// Configuration for combining a set of label hypotheses.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    /// Standard deviation (voxels) of the spatial Gaussian applied to the
    /// contour response. `0` disables smoothing.
    pub sigma: f32,
    /// Neighborhood used for boundary extraction.
    pub connectivity: Connectivity,
    /// Side of a transition that is marked as boundary.
    pub boundary_mode: BoundaryMode,
    /// Per-frame contour rescaling.
    pub contour_normalization: ContourNormalization,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            sigma: 0.0,
            connectivity: Connectivity::Face,
            boundary_mode: BoundaryMode::Inner,
            contour_normalization: ContourNormalization::None,
        }
    }
}

impl CombineConfig {
    /// Default configuration with the given smoothing scale.
    pub fn with_sigma(sigma: f32) -> Self {
        Self {
            sigma,
            ..Default::default()
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), CombineError> {
        validate_sigma(self.sigma)
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
