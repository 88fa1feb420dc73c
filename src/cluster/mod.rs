//! Clustering core: distance, neighbourhood search and DBSCAN labelling.
//!
//! Architecture:
//! ```text
//!   &[Point]  (input order)
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │  neighbors    │  LinearScan | GridIndex  (haversine via distance)
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │  dbscan       │  visited + label arrays → Clustering
//!   └──────────────┘
//!        │
//!        ▼
//!   Vec<Label>  → data::filter
//! ```

pub mod dbscan;
pub mod distance;
pub mod model;
pub mod neighbors;

pub use dbscan::{Dbscan, DbscanParams, IndexKind, ParamsError};
pub use distance::{haversine_km, EARTH_RADIUS_KM};
pub use model::{Cluster, ClusterId, Clustering, Label, Point};
pub use neighbors::{region_query, GridIndex, LinearScan, NeighborQuery};
