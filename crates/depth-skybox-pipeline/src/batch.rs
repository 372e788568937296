//! Batch processing of scans on a bounded worker pool.
//!
//! Every scan is an isolated unit of work: it shares no state with other
//! scans, its outputs are keyed by scan and panorama, and its failure is
//! recorded in the report without stopping the rest of the batch.

use std::collections::HashSet;
use std::path::Path;

use depth_skybox_fill::HoleFiller;
use log::{info, warn};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    DatasetLayout, ErrorKind, PipelineError, Result, SkyboxConfig, fill_scan_views, process_scan,
};

/// Scan ids from manifest text: one per line, trimmed, blank lines skipped.
/// Repeated ids are kept once, at their first position.
pub fn parse_manifest(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut scans = Vec::new();
    for line in text.lines() {
        let scan = line.trim();
        if scan.is_empty() {
            continue;
        }
        if !seen.insert(scan) {
            warn!("scan {scan} is listed more than once; processing it once");
            continue;
        }
        scans.push(scan.to_string());
    }
    scans
}

pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(parse_manifest(&text))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanStatus {
    /// `units` counts panoramas or views, depending on the job.
    Completed { units: usize },
    Failed { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub scan: String,
    #[serde(flatten)]
    pub status: ScanStatus,
}

impl ScanOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, ScanStatus::Completed { .. })
    }
}

/// Outcomes of a batch, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<ScanOutcome>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ScanOutcome> {
        self.outcomes.iter().filter(|o| !o.is_completed())
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Run `job` on every scan using `workers` threads.
pub fn run_batch<F>(scans: &[String], workers: usize, job: F) -> Result<BatchReport>
where
    F: Fn(&str) -> Result<usize> + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| PipelineError::Config(format!("cannot start worker pool: {e}")))?;

    let outcomes: Vec<ScanOutcome> = pool.install(|| {
        scans
            .par_iter()
            .map(|scan| {
                let status = match job(scan) {
                    Ok(units) => ScanStatus::Completed { units },
                    Err(e) => {
                        warn!("scan {scan} failed: {e}");
                        ScanStatus::Failed {
                            kind: e.kind(),
                            message: e.to_string(),
                        }
                    }
                };
                ScanOutcome {
                    scan: scan.clone(),
                    status,
                }
            })
            .collect()
    });

    let report = BatchReport { outcomes };
    info!(
        "batch finished: {} of {} scans completed",
        report.completed(),
        report.outcomes.len()
    );
    Ok(report)
}

/// Write depth skyboxes for every scan.
pub fn run_skybox_batch(
    layout: &DatasetLayout,
    scans: &[String],
    config: &SkyboxConfig,
) -> Result<BatchReport> {
    config.validate()?;
    run_batch(scans, config.workers, |scan| process_scan(layout, scan, config))
}

/// Write hole-filled copies of every source depth view of every scan.
pub fn run_fill_batch(
    layout: &DatasetLayout,
    scans: &[String],
    config: &SkyboxConfig,
) -> Result<BatchReport> {
    config.validate()?;
    let filler = HoleFiller::new(config.filter.clone())?;
    run_batch(scans, config.workers, |scan| {
        fill_scan_views(layout, scan, &filler)
    })
}
