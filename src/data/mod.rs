//! Data layer: loading, row bookkeeping, run reduction and output.
//!
//! Architecture:
//! ```text
//!  .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → PointTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ PointTable  │  raw rows, Vec<Point>, point → row index
//!   └────────────┘
//!        │   (cluster::Dbscan labels the points)
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  label runs → retained indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  writer   │  retained rows → file or stdout
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
