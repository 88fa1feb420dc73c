use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::cluster::{DbscanParams, IndexKind, ParamsError};

/// Command line for the filter.
#[derive(Parser, Debug, Clone)]
#[command(name = "dbscan-filter")]
#[command(about = "Cluster geographic points with DBSCAN and keep outliers plus the first point of each cluster run")]
pub struct Args {
    /// Input file: CSV with latitude,longitude columns, or a .json array of objects
    #[arg(short, long, default_value = "points.csv")]
    pub input: PathBuf,

    /// Output file with the retained rows (default: latitude,longitude lines on stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// DBSCAN epsilon: clustering radius in km
    #[arg(short, long, default_value_t = 0.1)]
    pub eps: f64,

    /// DBSCAN minPoints: neighbourhood size, the point itself included, that makes a core point
    #[arg(short = 'm', long, default_value_t = 3)]
    pub min_points: usize,

    /// Neighbourhood search used by the clustering
    #[arg(long, value_enum, default_value_t = IndexArg::Grid)]
    pub index: IndexArg,

    /// Also drop retained rows whose coordinates repeat an earlier retained row
    #[arg(long)]
    pub skip_duplicate_coordinates: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexArg {
    /// Compare every pair of points
    Scan,
    /// Uniform spatial grid
    Grid,
}

impl From<IndexArg> for IndexKind {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Scan => IndexKind::Scan,
            IndexArg::Grid => IndexKind::Grid,
        }
    }
}

impl Args {
    /// Validate the clustering parameters before anything is read.
    pub fn params(&self) -> Result<DbscanParams, ParamsError> {
        DbscanParams::new(self.eps, self.min_points)
    }

    /// Default log filter implied by `--debug`.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = Args::parse_from(["dbscan-filter"]);
        assert_eq!(args.input, PathBuf::from("points.csv"));
        assert_eq!(args.output, None);
        assert_eq!(args.eps, 0.1);
        assert_eq!(args.min_points, 3);
        assert_eq!(args.index, IndexArg::Grid);
        assert!(!args.skip_duplicate_coordinates);
        assert!(!args.debug);
        assert_eq!(args.log_filter(), "warn");
    }

    #[test]
    fn short_and_long_flags() {
        let args = Args::parse_from([
            "dbscan-filter",
            "-i",
            "in.csv",
            "-o",
            "out.csv",
            "-e",
            "0.25",
            "-m",
            "5",
            "--index",
            "scan",
            "--skip-duplicate-coordinates",
            "--report",
            "run.json",
            "-d",
        ]);
        assert_eq!(args.input, PathBuf::from("in.csv"));
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.eps, 0.25);
        assert_eq!(args.min_points, 5);
        assert_eq!(IndexKind::from(args.index), IndexKind::Scan);
        assert!(args.skip_duplicate_coordinates);
        assert_eq!(args.report, Some(PathBuf::from("run.json")));
        assert_eq!(args.log_filter(), "debug");
    }

    #[test]
    fn invalid_params_are_reported() {
        let args = Args::parse_from(["dbscan-filter", "--eps", "0"]);
        assert!(matches!(args.params(), Err(ParamsError::InvalidEps(_))));

        let args = Args::parse_from(["dbscan-filter", "--min-points", "0"]);
        assert!(matches!(args.params(), Err(ParamsError::InvalidMinPoints(0))));
    }
}
