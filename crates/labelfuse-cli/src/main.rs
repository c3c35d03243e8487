//! labelfuse CLI: combine segmentation label frames into detection and
//! contour maps.

mod io;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "labelfuse")]
#[command(
    about = "Combine multiple segmentation hypotheses into detection and contour maps for cell tracking"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine label hypotheses and write detection/contour frames.
    Combine(CliCombineArgs),

    /// Print the default combine configuration as JSON.
    ConfigTemplate,
}

#[derive(Debug, Clone, Args)]
struct CliCombineArgs {
    /// Label hypothesis: one label image, or a directory of frames sorted by
    /// name. Repeat once per hypothesis.
    #[arg(long = "labels", required = true)]
    labels: Vec<PathBuf>,

    /// Output directory; receives `detection/` and `contours/` subdirectories.
    #[arg(long)]
    out_dir: PathBuf,

    /// JSON configuration file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gaussian sigma (pixels) for contour smoothing; 0 disables.
    #[arg(long, allow_negative_numbers = true)]
    sigma: Option<f32>,

    /// Neighborhood used for boundary extraction.
    #[arg(long, value_enum)]
    connectivity: Option<ConnectivityArg>,

    /// Which side of a label transition is marked as contour.
    #[arg(long, value_enum)]
    boundary_mode: Option<BoundaryModeArg>,

    /// Per-frame contour rescaling.
    #[arg(long, value_enum)]
    normalize: Option<NormalizeArg>,

    /// Path to write a run summary (JSON).
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConnectivityArg {
    Face,
    Full,
}

impl ConnectivityArg {
    fn to_core(self) -> labelfuse::Connectivity {
        match self {
            Self::Face => labelfuse::Connectivity::Face,
            Self::Full => labelfuse::Connectivity::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoundaryModeArg {
    Inner,
    Thick,
}

impl BoundaryModeArg {
    fn to_core(self) -> labelfuse::BoundaryMode {
        match self {
            Self::Inner => labelfuse::BoundaryMode::Inner,
            Self::Thick => labelfuse::BoundaryMode::Thick,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NormalizeArg {
    None,
    FrameMax,
}

impl NormalizeArg {
    fn to_core(self) -> labelfuse::ContourNormalization {
        match self {
            Self::None => labelfuse::ContourNormalization::None,
            Self::FrameMax => labelfuse::ContourNormalization::FrameMax,
        }
    }
}

impl CliCombineArgs {
    /// File (or default) config with flag overrides applied.
    fn build_config(&self) -> CliResult<labelfuse::CombineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config: {}", path.display());
                labelfuse::CombineConfig::from_json_file(path)?
            }
            None => labelfuse::CombineConfig::default(),
        };

        if let Some(sigma) = self.sigma {
            config.sigma = sigma;
        }
        if let Some(c) = self.connectivity {
            config.connectivity = c.to_core();
        }
        if let Some(m) = self.boundary_mode {
            config.boundary_mode = m.to_core();
        }
        if let Some(n) = self.normalize {
            config.contour_normalization = n.to_core();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Combine(args) => run_combine(&args),
        Commands::ConfigTemplate => run_config_template(),
    }
}

// ── config-template ────────────────────────────────────────────────────

fn config_template() -> CliResult<String> {
    Ok(serde_json::to_string_pretty(&labelfuse::CombineConfig::default())?)
}

fn run_config_template() -> CliResult<()> {
    println!("{}", config_template()?);
    Ok(())
}

// ── combine ────────────────────────────────────────────────────────────

fn run_combine(args: &CliCombineArgs) -> CliResult<()> {
    let config = args.build_config()?;

    let mut stacks = Vec::with_capacity(args.labels.len());
    for path in &args.labels {
        tracing::info!("Loading labels: {}", path.display());
        stacks.push(io::read_label_stack(path)?);
    }

    let volumes: Vec<_> = stacks.iter().map(|s| s.volume.view()).collect();
    let combiner = labelfuse::Combiner::with_config(config);
    let (maps, summary) = combiner.combine_with_summary(&volumes)?;

    tracing::info!(
        "Combined {} hypotheses over {} frame(s), foreground fraction {:.4}, contour max {:.3}",
        summary.n_hypotheses,
        summary.foreground_voxels_per_frame.len(),
        summary.foreground_fraction,
        summary.contour_max,
    );

    io::write_maps(&args.out_dir, &maps, &stacks[0].frame_names)?;
    tracing::info!("Maps written to {}", args.out_dir.display());

    if let Some(summary_path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(summary_path, &json)?;
        tracing::info!("Summary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> CliCombineArgs {
        match Cli::try_parse_from(argv.iter().copied()).unwrap().command {
            Commands::Combine(args) => args,
            Commands::ConfigTemplate => panic!("expected combine"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "labelfuse",
            "combine",
            "--labels",
            "a",
            "--labels",
            "b",
            "--out-dir",
            "out",
            "--sigma",
            "1.5",
            "--connectivity",
            "full",
            "--normalize",
            "frame-max",
        ]);
        assert_eq!(args.labels.len(), 2);
        let cfg = args.build_config().unwrap();
        assert_eq!(cfg.sigma, 1.5);
        assert_eq!(cfg.connectivity, labelfuse::Connectivity::Full);
        assert_eq!(cfg.boundary_mode, labelfuse::BoundaryMode::Inner);
        assert_eq!(
            cfg.contour_normalization,
            labelfuse::ContourNormalization::FrameMax
        );
    }

    #[test]
    fn negative_sigma_flag_is_rejected() {
        let args = parse(&[
            "labelfuse", "combine", "--labels", "a", "--out-dir", "o", "--sigma", "-1",
        ]);
        assert!(args.build_config().is_err());
    }

    #[test]
    fn labels_are_required() {
        assert!(Cli::try_parse_from(["labelfuse", "combine", "--out-dir", "o"]).is_err());
    }

    #[test]
    fn config_template_parses_back_to_default() {
        let json = config_template().unwrap();
        let cfg: labelfuse::CombineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, labelfuse::CombineConfig::default());
    }

    /// Write `frames` label images of `w`x5 pixels with a square moving right.
    fn write_hypothesis(dir: &std::path::Path, frames: u32, w: u32) {
        use image::{ImageBuffer, Luma};

        std::fs::create_dir_all(dir).unwrap();
        for t in 0..frames {
            let mut img = ImageBuffer::<Luma<u16>, Vec<u16>>::new(w, 5);
            for y in 1..3 {
                for x in (1 + t)..(3 + t) {
                    img.put_pixel(x, y, Luma([4]));
                }
            }
            img.save(dir.join(format!("t{:03}.png", t))).unwrap();
        }
    }

    fn combine_args(
        labels: Vec<PathBuf>,
        out_dir: PathBuf,
        summary: Option<PathBuf>,
    ) -> CliCombineArgs {
        CliCombineArgs {
            labels,
            out_dir,
            config: None,
            sigma: Some(0.0),
            connectivity: None,
            boundary_mode: None,
            normalize: None,
            summary,
        }
    }

    #[test]
    fn combine_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_hypothesis(&dir.path().join("h0"), 2, 6);
        write_hypothesis(&dir.path().join("h1"), 2, 6);
        let out = dir.path().join("out");
        let summary = dir.path().join("summary.json");
        let args = combine_args(
            vec![dir.path().join("h0"), dir.path().join("h1")],
            out.clone(),
            Some(summary.clone()),
        );
        run_combine(&args).unwrap();

        assert!(out.join("detection/t000.png").is_file());
        assert!(out.join("contours/t001.png").is_file());
        let report: labelfuse::CombineSummary =
            serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(report.n_hypotheses, 2);
        assert_eq!(report.shape, vec![2, 5, 6]);
        assert_eq!(report.foreground_voxels_per_frame, vec![4, 4]);
    }

    #[test]
    fn hypotheses_disagreeing_on_frames_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_hypothesis(&dir.path().join("h0"), 2, 6);
        write_hypothesis(&dir.path().join("short"), 1, 6);
        write_hypothesis(&dir.path().join("wide"), 2, 7);

        for other in ["short", "wide"] {
            let out = dir.path().join(format!("out_{}", other));
            let summary = dir.path().join(format!("{}.json", other));
            let args = combine_args(
                vec![dir.path().join("h0"), dir.path().join(other)],
                out.clone(),
                Some(summary.clone()),
            );
            let err = run_combine(&args).unwrap_err();
            assert!(err.to_string().contains("shape mismatch"), "{}", err);
            assert!(!out.exists());
            assert!(!summary.exists());
        }
    }
}
