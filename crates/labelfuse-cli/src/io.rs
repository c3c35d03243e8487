//! Label frame reading and map writing.
//!
//! A hypothesis is either one label image (a single 2-D frame) or a
//! directory of label images whose sorted file names define the time axis.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use labelfuse::CombinedMaps;
use ndarray::{stack, Array2, ArrayD, Axis};

use crate::{CliError, CliResult};

const LABEL_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

/// A hypothesis loaded as a `(T, H, W)` label volume.
pub(crate) struct LabelStack {
    pub volume: ArrayD<u16>,
    /// File stem of every frame, in time order.
    pub frame_names: Vec<String>,
}

fn is_label_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| LABEL_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn frame_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string())
}

/// Read one single-channel 8- or 16-bit label image as `(H, W)`.
pub(crate) fn read_label_frame(path: &Path) -> CliResult<Array2<u16>> {
    let img = image::open(path).map_err(|e| -> CliError {
        format!("Failed to open label image {}: {}", path.display(), e).into()
    })?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    let raw: Vec<u16> = match img {
        DynamicImage::ImageLuma16(buf) => buf.into_raw(),
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(u16::from).collect(),
        other => {
            return Err(format!(
                "{}: label images must be single-channel 8- or 16-bit, got {:?}",
                path.display(),
                other.color()
            )
            .into())
        }
    };
    Ok(Array2::from_shape_vec((h, w), raw)?)
}

/// List label images in `dir`, sorted by file name.
///
/// Output frames are named by file stem, so two images sharing a stem
/// (`t000.png`, `t000.tif`) are rejected.
fn list_label_frames(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_label_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    if paths.is_empty() {
        return Err(format!("no label images found in {}", dir.display()).into());
    }
    let mut stems = HashSet::with_capacity(paths.len());
    for p in &paths {
        if !stems.insert(frame_name(p)) {
            return Err(format!(
                "{}: another label image in {} has the same name",
                p.display(),
                dir.display()
            )
            .into());
        }
    }
    Ok(paths)
}

/// Load one hypothesis from an image file or a directory of frames.
pub(crate) fn read_label_stack(path: &Path) -> CliResult<LabelStack> {
    let paths = if path.is_dir() {
        list_label_frames(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut frames: Vec<Array2<u16>> = Vec::with_capacity(paths.len());
    for p in &paths {
        let frame = read_label_frame(p)?;
        if let Some(first) = frames.first() {
            if first.dim() != frame.dim() {
                return Err(format!(
                    "{}: frame size {:?} differs from {:?}",
                    p.display(),
                    frame.dim(),
                    first.dim()
                )
                .into());
            }
        }
        frames.push(frame);
    }

    let views: Vec<_> = frames.iter().map(|f| f.view()).collect();
    let volume = stack(Axis(0), &views)?.into_dyn();
    tracing::debug!(
        "Loaded {} frame(s) of {:?} from {}",
        paths.len(),
        &volume.shape()[1..],
        path.display()
    );
    Ok(LabelStack {
        volume,
        frame_names: paths.iter().map(|p| frame_name(p)).collect(),
    })
}

fn frame_dims(maps: &CombinedMaps) -> CliResult<(u32, u32)> {
    match maps.shape() {
        [_, h, w] => Ok((u32::try_from(*w)?, u32::try_from(*h)?)),
        other => Err(format!("expected (T, H, W) maps, got shape {:?}", other).into()),
    }
}

/// Write detection frames as 8-bit PNG (0/255) and contour frames as 16-bit
/// PNG (value scaled to 0..=65535) under `out_dir/detection` and
/// `out_dir/contours`.
pub(crate) fn write_maps(
    out_dir: &Path,
    maps: &CombinedMaps,
    frame_names: &[String],
) -> CliResult<()> {
    let (w, h) = frame_dims(maps)?;
    let det_dir = out_dir.join("detection");
    let con_dir = out_dir.join("contours");
    std::fs::create_dir_all(&det_dir)?;
    std::fs::create_dir_all(&con_dir)?;

    for (t, name) in frame_names.iter().enumerate() {
        let det: Vec<u8> = maps
            .detection
            .index_axis(Axis(0), t)
            .iter()
            .map(|&v| if v > 0.0 { 255 } else { 0 })
            .collect();
        let det_img = GrayImage::from_raw(w, h, det)
            .ok_or_else(|| -> CliError { "detection buffer size mismatch".into() })?;
        det_img.save(det_dir.join(format!("{}.png", name)))?;

        let con: Vec<u16> = maps
            .contours
            .index_axis(Axis(0), t)
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
            .collect();
        let con_img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w, h, con)
            .ok_or_else(|| -> CliError { "contour buffer size mismatch".into() })?;
        con_img.save(con_dir.join(format!("{}.png", name)))?;
    }
    Ok(())
}
