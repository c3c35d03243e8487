//! High-level combination API.
//!
//! [`Combiner`] is the primary entry point. It wraps a [`CombineConfig`] and
//! applies it to any number of hypothesis sets.

use std::path::Path;

use ndarray::ArrayViewD;

use crate::config::CombineConfig;
use crate::summary::CombineSummary;
use crate::volume::{CombineError, LabelValue};
use crate::CombinedMaps;

/// Label-set combiner.
///
/// Holds configuration only, so one instance can be shared across threads
/// and reused for many input sets.
///
/// # Examples
///
/// ```
/// use labelfuse::Combiner;
/// use ndarray::{ArrayD, IxDyn};
///
/// let mut a = ArrayD::<u16>::zeros(IxDyn(&[2, 8, 8]));
/// a[[0, 2, 2]] = 1;
/// let b = a.clone();
///
/// let combiner = Combiner::new(1.0);
/// let maps = combiner.combine(&[a.view(), b.view()]).unwrap();
/// assert_eq!(maps.detection[[0, 2, 2]], 1.0);
/// assert_eq!(maps.shape(), &[2, 8, 8]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Combiner {
    config: CombineConfig,
}

impl Combiner {
    /// Combiner with default settings and the given smoothing scale.
    pub fn new(sigma: f32) -> Self {
        Self {
            config: CombineConfig::with_sigma(sigma),
        }
    }

    /// Create with full config control.
    pub fn with_config(config: CombineConfig) -> Self {
        Self { config }
    }

    /// Load the configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            config: CombineConfig::from_json_file(path)?,
        })
    }

    /// Access the current configuration.
    pub fn config(&self) -> &CombineConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut CombineConfig {
        &mut self.config
    }

    /// Combine label volumes of shape `(T, ...spatial)`.
    pub fn combine<L: LabelValue>(
        &self,
        volumes: &[ArrayViewD<'_, L>],
    ) -> Result<CombinedMaps, CombineError> {
        crate::pipeline::combine_volumes(volumes, &self.config)
    }

    /// Combine label frames in which every axis is spatial.
    pub fn combine_frame<L: LabelValue>(
        &self,
        frames: &[ArrayViewD<'_, L>],
    ) -> Result<CombinedMaps, CombineError> {
        crate::pipeline::combine_frames(frames, &self.config)
    }

    /// [`combine`](Self::combine), plus a summary of the produced maps.
    pub fn combine_with_summary<L: LabelValue>(
        &self,
        volumes: &[ArrayViewD<'_, L>],
    ) -> Result<(CombinedMaps, CombineSummary), CombineError> {
        let maps = self.combine(volumes)?;
        let summary = CombineSummary::from_maps(&maps, volumes.len(), &self.config, true);
        Ok((maps, summary))
    }
}
