//! Density-based thinning of geographic point sets.
//!
//! Points are clustered with DBSCAN over haversine distance, then each run of
//! identically labelled consecutive points is reduced to its first point while
//! every outlier is kept.

pub mod app;
pub mod cluster;
pub mod config;
pub mod data;
