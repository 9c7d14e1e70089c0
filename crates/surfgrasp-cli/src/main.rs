//! surfgrasp CLI: command-line interface for grasp candidate detection.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use surfgrasp::{GraspConfig, GraspDetector};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "surfgrasp")]
#[command(about = "Rank suction grasp candidates on the visible surface of a 3D point cloud")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and rank grasp candidates in a point cloud.
    Detect(CliDetectArgs),

    /// Print the canonical (principal-axis) frame of a point cloud.
    Frame {
        /// Path to the input cloud (.json, .xyz, .txt, .pts).
        #[arg(long)]
        cloud: PathBuf,

        /// Optional JSON config (only `grip_roll_offset` is used).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliDetectArgs {
    /// Path to the input cloud (.json, .xyz, .txt, .pts).
    #[arg(long)]
    cloud: PathBuf,

    /// Path to write detection results (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Base configuration (JSON, partial documents allowed).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum admissible distance from a grasp to the object boundary.
    #[arg(long)]
    boundary_threshold: Option<f64>,

    /// Weight of the flatness term of the utility.
    #[arg(long)]
    curvature_weight: Option<f64>,

    /// Weight of the boundary-distance term of the utility.
    #[arg(long)]
    boundary_weight: Option<f64>,

    /// Keep at most this many ranked grasps.
    #[arg(long)]
    max_candidates: Option<usize>,
}

impl CliDetectArgs {
    fn apply_overrides(&self, config: &mut GraspConfig) {
        if let Some(v) = self.boundary_threshold {
            config.boundary_threshold = v;
        }
        if let Some(v) = self.curvature_weight {
            config.curvature_weight = v;
        }
        if let Some(v) = self.boundary_weight {
            config.boundary_weight = v;
        }
        if let Some(v) = self.max_candidates {
            config.max_candidates = Some(v);
        }
    }
}

fn load_config(path: Option<&Path>) -> CliResult<GraspConfig> {
    match path {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            GraspConfig::from_json_file(p)
        }
        None => Ok(GraspConfig::default()),
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
        Commands::Detect(args) => run_detect(&args),
        Commands::Frame { cloud, config } => run_frame(&cloud, config.as_deref()),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&GraspConfig::default())?);
    Ok(())
}

// ── frame ──────────────────────────────────────────────────────────────

fn run_frame(cloud_path: &Path, config_path: Option<&Path>) -> CliResult<()> {
    tracing::info!("Loading cloud: {}", cloud_path.display());
    let cloud = surfgrasp::io::load_cloud(cloud_path)?;
    let detector = GraspDetector::with_config(load_config(config_path)?);
    let frame = detector.canonical_frame(&cloud)?;
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(args: &CliDetectArgs) -> CliResult<()> {
    tracing::info!("Loading cloud: {}", args.cloud.display());
    let cloud = surfgrasp::io::load_cloud(&args.cloud)?;
    tracing::info!("Cloud size: {} points", cloud.len());

    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    let detector = GraspDetector::with_config(config);
    let result = detector.detect(&cloud);

    if result.is_ok() {
        tracing::info!(
            "Ranked {} grasps ({} samples, {} rejected near boundary)",
            result.ranked.len(),
            result.stats.samples,
            result.stats.rejected,
        );
        if let Some(best) = result.best() {
            tracing::info!(
                "Best grasp: utility={:.3} at ({:.4}, {:.4}, {:.4})",
                best.utility,
                best.pose.position[0],
                best.pose.position[1],
                best.pose.position[2],
            );
        }
    } else {
        tracing::warn!("Detection finished with status: {}", result.status);
    }

    let json = serde_json::to_string_pretty(&result)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());
    Ok(())
}
