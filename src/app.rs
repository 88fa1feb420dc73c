use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::cluster::{Clustering, Dbscan, DbscanParams, IndexKind, Point};
use crate::config::Args;
use crate::data::filter::{retained_indices, skip_repeated_coordinates};
use crate::data::loader::load_file;
use crate::data::writer::{write_file, write_lines};

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// What a run did, for logs and the optional `--report` file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub input: String,
    pub points: usize,
    pub skipped_rows: usize,
    pub clusters: usize,
    pub noise: usize,
    pub retained: usize,
    pub eps_km: f64,
    pub min_points: usize,
}

impl RunReport {
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing run report")?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("writing report {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Cluster `points` and pick the indices to keep.
pub fn thin_points(
    points: &[Point],
    params: DbscanParams,
    index: IndexKind,
    skip_duplicates: bool,
) -> (Clustering, Vec<usize>) {
    let clustering = Dbscan::new(params).cluster_points(points, index);
    let mut retained = retained_indices(&clustering.labels);
    if skip_duplicates {
        let before = retained.len();
        retained = skip_repeated_coordinates(points, &retained);
        debug!("dropped {} rows with repeated coordinates", before - retained.len());
    }
    (clustering, retained)
}

/// Load, cluster, reduce and write, as configured by `args`.
pub fn run(args: &Args) -> Result<RunReport> {
    let params = args.params().context("invalid clustering parameters")?;

    let table = load_file(&args.input).context("Error reading input")?;
    if table.is_empty() {
        bail!("No points found in {}", args.input.display());
    }

    info!(
        "running DBSCAN with eps={:.4} km, minPoints={}",
        params.eps(),
        params.min_points()
    );
    let (clustering, retained) = thin_points(
        &table.points,
        params,
        args.index.into(),
        args.skip_duplicate_coordinates,
    );
    info!("found {} clusters", clustering.cluster_count());
    info!("found {} noise points", clustering.noise_count());
    info!("filtered to {} points", retained.len());

    match &args.output {
        Some(path) => write_file(path, &table, &retained)?,
        None => write_lines(io::stdout().lock(), &table, &retained)
            .context("writing to stdout")?,
    }

    let report = RunReport {
        input: args.input.display().to_string(),
        points: table.len(),
        skipped_rows: table.skipped_rows(),
        clusters: clustering.cluster_count(),
        noise: clustering.noise_count(),
        retained: retained.len(),
        eps_km: params.eps(),
        min_points: params.min_points(),
    };
    if let Some(path) = &args.report {
        report.write(path)?;
        info!("run report written to {}", path.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thin_points_keeps_first_of_cluster_and_outliers() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0005),
            Point::new(0.0, 0.0009),
            Point::new(0.0, 10.0),
        ];
        let params = DbscanParams::new(0.1, 3).unwrap();
        let (clustering, retained) = thin_points(&points, params, IndexKind::Grid, false);
        assert_eq!(clustering.cluster_count(), 1);
        assert_eq!(retained, vec![0, 3]);
    }

    #[test]
    fn thin_points_can_skip_repeated_coordinates() {
        // Three isolated outliers, two of them at the same spot.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        let params = DbscanParams::new(0.1, 3).unwrap();
        let (_, plain) = thin_points(&points, params, IndexKind::Scan, false);
        let (_, deduped) = thin_points(&points, params, IndexKind::Scan, true);
        assert_eq!(plain, vec![0, 1, 2]);
        assert_eq!(deduped, vec![0, 1]);
    }

    #[test]
    fn report_serializes_all_counts() {
        let report = RunReport {
            input: "points.csv".into(),
            points: 8,
            skipped_rows: 0,
            clusters: 2,
            noise: 2,
            retained: 4,
            eps_km: 0.1,
            min_points: 3,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["clusters"], 2);
        assert_eq!(value["retained"], 4);
        assert_eq!(value["eps_km"], 0.1);
    }
}
