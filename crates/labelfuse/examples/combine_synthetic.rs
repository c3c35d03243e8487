use labelfuse::{CombineConfig, Combiner, ContourNormalization};
use ndarray::{Array3, ArrayD};
use std::error::Error;

/// Two "segmentations" of the same moving cell that disagree on its size.
fn hypothesis(radius: f32) -> ArrayD<u16> {
    let (t, h, w) = (5, 32, 32);
    let mut vol = Array3::<u16>::zeros((t, h, w));
    for ti in 0..t {
        let cx = 8.0 + 4.0 * ti as f32;
        let cy = 16.0;
        for y in 0..h {
            for x in 0..w {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    vol[[ti, y, x]] = 1;
                }
            }
        }
    }
    vol.into_dyn()
}

fn main() -> Result<(), Box<dyn Error>> {
    let sigma: f32 = match std::env::args().nth(1) {
        Some(s) => s.parse()?,
        None => 1.0,
    };

    let small = hypothesis(5.0);
    let large = hypothesis(7.0);

    let combiner = Combiner::with_config(CombineConfig {
        sigma,
        contour_normalization: ContourNormalization::FrameMax,
        ..Default::default()
    });
    let (maps, summary) = combiner.combine_with_summary(&[small.view(), large.view()])?;

    println!("Combined {} hypotheses, shape {:?}", summary.n_hypotheses, maps.shape());
    for (t, n) in summary.foreground_voxels_per_frame.iter().enumerate() {
        println!("  frame {}: {} foreground voxels", t, n);
    }
    println!(
        "contour mean {:.4}, max {:.4}",
        summary.contour_mean, summary.contour_max
    );
    Ok(())
}
