use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use depth_skybox_pipeline::{
    BatchReport, DEFAULT_BASE_DIR, DatasetLayout, ScanStatus, SkyboxConfig, read_manifest,
    run_fill_batch, run_skybox_batch,
};
use log::info;

/// Depth skybox generation for panoramic RGB-D scans.
#[derive(Debug, Parser)]
#[command(author, version, about = "Depth skybox generation for panoramic RGB-D scans")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a depth skybox for every panorama of every scan.
    Skybox {
        #[command(flatten)]
        common: CommonArgs,

        /// Store the downsampled faces without hole filling.
        #[arg(long)]
        no_fill: bool,

        /// Also write colormapped debug renders of every face.
        #[arg(long)]
        visualize: bool,
    },
    /// Write hole-filled copies of every source depth view.
    FillViews {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Newline-separated list of scan ids.
    #[arg(long)]
    manifest: PathBuf,

    /// Directory holding one sub-directory per scan.
    #[arg(long, default_value = DEFAULT_BASE_DIR)]
    base_dir: PathBuf,

    /// Optional JSON SkyboxConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of scans processed concurrently.
    #[arg(long)]
    workers: Option<usize>,
}

fn load_config(path: Option<&Path>) -> Result<SkyboxConfig> {
    match path {
        Some(p) => SkyboxConfig::from_json_file(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(SkyboxConfig::default()),
    }
}

fn run_command(command: Command) -> Result<BatchReport> {
    let (common, skybox_overrides) = match command {
        Command::Skybox {
            common,
            no_fill,
            visualize,
        } => (common, Some((no_fill, visualize))),
        Command::FillViews { common } => (common, None),
    };

    let mut config = load_config(common.config.as_deref())?;
    if let Some(workers) = common.workers {
        config.workers = workers;
    }
    if let Some((no_fill, visualize)) = skybox_overrides {
        config.fill_holes &= !no_fill;
        config.visualize |= visualize;
    }

    let scans = read_manifest(&common.manifest)
        .with_context(|| format!("reading manifest {}", common.manifest.display()))?;
    let layout = DatasetLayout::new(common.base_dir);
    info!(
        "{} scans under {} with {} workers",
        scans.len(),
        layout.base_dir().display(),
        config.workers
    );

    let report = if skybox_overrides.is_some() {
        run_skybox_batch(&layout, &scans, &config)
    } else {
        run_fill_batch(&layout, &scans, &config)
    };
    report.context("batch could not start")
}

fn summary(report: &BatchReport) -> String {
    let mut out = format!(
        "{} of {} scans completed",
        report.completed(),
        report.outcomes.len()
    );
    for outcome in report.failed() {
        if let ScanStatus::Failed { message, .. } = &outcome.status {
            out.push_str(&format!("\n  {}: {message}", outcome.scan));
        }
    }
    out
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match try_main() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Returns whether every scan completed.
fn try_main() -> Result<bool> {
    let cli = Cli::parse();
    let report = run_command(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    eprintln!("{}", summary(&report));
    Ok(report.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use depth_skybox_core::synthetic::{calibration_text, plane_depth, synthetic_panorama};
    use depth_skybox_core::PinholeIntrinsics;
    use depth_skybox_pipeline::io::{load_depth, save_depth_png};
    use std::fs;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("depth-skybox").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    fn write_scan(base: &Path, scan: &str) {
        let k = PinholeIntrinsics::ideal(16, 16);
        let record = synthetic_panorama("pano", k);
        let layout = DatasetLayout::new(base);
        let calib = layout.calibration(scan);
        fs::create_dir_all(calib.parent().unwrap()).unwrap();
        fs::write(&calib, calibration_text(&[record.clone()])).unwrap();

        let mut depth = plane_depth(16, 16, 1200);
        depth.set(3, 4, 0);
        for view in record.views() {
            save_depth_png(&layout.depth_image(scan, &view.id), &depth).unwrap();
            let color = layout.color_image(scan, &view.id);
            fs::create_dir_all(color.parent().unwrap()).unwrap();
            image::RgbImage::from_pixel(16, 16, image::Rgb([90, 120, 30]))
                .save(&color)
                .unwrap();
        }
    }

    #[test]
    fn flags_override_config_file() {
        let mut config_file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut config_file, br#"{"workers": 3, "visualize": false}"#)
            .unwrap();
        let path = config_file.path().to_str().unwrap();

        let Command::Skybox {
            common,
            no_fill,
            visualize,
        } = parse(&["skybox", "--manifest", "m.txt", "--config", path, "--no-fill", "--visualize"])
        else {
            panic!("expected skybox command");
        };
        assert_eq!(common.base_dir, Path::new(DEFAULT_BASE_DIR));
        let config = load_config(common.config.as_deref()).unwrap();
        assert_eq!(config.workers, 3);
        assert!(no_fill && visualize);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let err = run_command(parse(&["fill-views", "--manifest", "/nonexistent/scans.txt"]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("reading manifest"));
    }

    #[test]
    fn fill_views_reports_every_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_scan(dir.path(), "scanA");
        let manifest = dir.path().join("scans.txt");
        fs::write(&manifest, "scanA\n\n  missing \n").unwrap();

        let report = run_command(parse(&[
            "fill-views",
            "--manifest",
            manifest.to_str().unwrap(),
            "--base-dir",
            dir.path().to_str().unwrap(),
            "--workers",
            "2",
        ]))
        .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].status, ScanStatus::Completed { units: 18 });
        assert!(!report.is_success());
        assert!(summary(&report).contains("missing"));

        let layout = DatasetLayout::new(dir.path());
        let view = synthetic_panorama("pano", PinholeIntrinsics::ideal(16, 16)).views()[0]
            .id
            .clone();
        let filled = load_depth(&layout.filled_depth_image("scanA", &view)).unwrap();
        assert_eq!(filled.count_valid(), filled.len());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][1]["status"], "failed");
        assert_eq!(json["outcomes"][1]["kind"], "io");
    }
}
