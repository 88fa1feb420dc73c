use std::collections::HashMap;

use super::distance::{haversine_km, to_cartesian_km};
use super::model::Point;

/// Epsilon-neighbourhood lookup over a fixed point set.
///
/// Implementations must return every index `j` with
/// `haversine_km(points[i], points[j]) <= eps`, always including `i`, in
/// ascending order.
pub trait NeighborQuery {
    fn neighbors(&self, i: usize) -> Vec<usize>;

    /// Number of points the query covers.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All indices within `eps` km of `points[i]`, by scanning every point.
pub fn region_query(points: &[Point], i: usize, eps: f64) -> Vec<usize> {
    let p = &points[i];
    points
        .iter()
        .enumerate()
        .filter(|(j, q)| *j == i || haversine_km(p, q) <= eps)
        .map(|(j, _)| j)
        .collect()
}

// ---------------------------------------------------------------------------
// LinearScan – O(n) per query
// ---------------------------------------------------------------------------

pub struct LinearScan<'a> {
    points: &'a [Point],
    eps: f64,
}

impl<'a> LinearScan<'a> {
    pub fn new(points: &'a [Point], eps: f64) -> Self {
        LinearScan { points, eps }
    }
}

impl NeighborQuery for LinearScan<'_> {
    fn neighbors(&self, i: usize) -> Vec<usize> {
        region_query(self.points, i, self.eps)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

// ---------------------------------------------------------------------------
// GridIndex – uniform 3-D grid over the sphere
// ---------------------------------------------------------------------------

/// Slack added to the cell edge so rounding in the Cartesian projection can
/// never push a true neighbour outside the scanned cells.
const CELL_PAD_KM: f64 = 1e-9;
const CELL_PAD_REL: f64 = 1e-9;

/// Uniform grid index.
///
/// Points are projected onto the Earth sphere in Cartesian kilometres and
/// bucketed into cubes with an edge just above `eps`. The chord between two
/// points never exceeds their great-circle distance, so every neighbour lies
/// in one of the 27 cells around the query point; candidates from those cells
/// are then checked with the exact haversine distance.
pub struct GridIndex<'a> {
    points: &'a [Point],
    eps: f64,
    cell: f64,
    coords: Vec<[f64; 3]>,
    /// Cell key → slot in `buckets`.
    slots: HashMap<[i64; 3], usize>,
    /// Point indices per occupied cell, ascending.
    buckets: Vec<Vec<usize>>,
}

impl<'a> GridIndex<'a> {
    pub fn new(points: &'a [Point], eps: f64) -> Self {
        let cell = eps * (1.0 + CELL_PAD_REL) + CELL_PAD_KM;
        let coords: Vec<[f64; 3]> = points.iter().map(to_cartesian_km).collect();

        let mut slots: HashMap<[i64; 3], usize> = HashMap::new();
        let mut buckets: Vec<Vec<usize>> = Vec::new();
        for (i, c) in coords.iter().enumerate() {
            let key = c.map(|v| cell_coord(v, cell));
            let slot = *slots.entry(key).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(i);
        }

        log::debug!(
            "grid index: {} points in {} cells (edge {:.6} km)",
            points.len(),
            buckets.len(),
            cell
        );

        GridIndex {
            points,
            eps,
            cell,
            coords,
            slots,
            buckets,
        }
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.buckets.len()
    }
}

fn cell_coord(v: f64, cell: f64) -> i64 {
    (v / cell).floor() as i64
}

impl NeighborQuery for GridIndex<'_> {
    fn neighbors(&self, i: usize) -> Vec<usize> {
        let c = self.coords[i];
        let lo = c.map(|v| cell_coord(v - self.cell, self.cell));
        let hi = c.map(|v| cell_coord(v + self.cell, self.cell));

        let p = &self.points[i];
        let mut found = Vec::new();
        for x in lo[0]..=hi[0] {
            for y in lo[1]..=hi[1] {
                for z in lo[2]..=hi[2] {
                    let Some(&slot) = self.slots.get(&[x, y, z]) else {
                        continue;
                    };
                    found.extend(
                        self.buckets[slot]
                            .iter()
                            .copied()
                            .filter(|&j| j == i || haversine_km(p, &self.points[j]) <= self.eps),
                    );
                }
            }
        }
        found.sort_unstable();
        found
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Point> {
        vec![
            Point::new(30.244759, 59.955982),
            Point::new(30.24472, 59.955975),
            Point::new(30.244358, 59.96698),
            Point::new(30.258387, 59.951557),
            Point::new(30.434124, 60.029499),
            Point::new(179.9999, 0.0),
            Point::new(-179.9999, 0.0),
            Point::new(0.0, 89.99999),
            Point::new(120.0, 89.99999),
            Point::new(30.244759, 59.955982),
        ]
    }

    /// Small deterministic generator for scattered coordinates.
    fn scatter(n: usize, seed: u64) -> Vec<Point> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        (0..n)
            .map(|_| Point::new(13.3 + next() * 0.2, 52.4 + next() * 0.2))
            .collect()
    }

    #[test]
    fn linear_scan_includes_query_point() {
        let points = sample_points();
        let scan = LinearScan::new(&points, 0.0001);
        for i in 0..points.len() {
            assert!(scan.neighbors(i).contains(&i));
        }
    }

    #[test]
    fn linear_scan_is_ascending_and_includes_duplicates() {
        let points = sample_points();
        // Index 3 sits about 0.9 km away, just outside the radius.
        assert_eq!(LinearScan::new(&points, 0.8).neighbors(0), vec![0, 1, 9]);
        assert_eq!(LinearScan::new(&points, 1.0).neighbors(0), vec![0, 1, 3, 9]);
    }

    #[test]
    fn neighbourhood_crosses_antimeridian_and_pole() {
        let points = sample_points();
        let scan = LinearScan::new(&points, 0.1);
        assert_eq!(scan.neighbors(5), vec![5, 6]);
        assert_eq!(scan.neighbors(7), vec![7, 8]);
    }

    #[test]
    fn grid_matches_linear_scan_on_sample() {
        let points = sample_points();
        for eps in [0.0001, 0.003, 0.1, 0.8, 1.5, 30.0, 20_000.0] {
            let scan = LinearScan::new(&points, eps);
            let grid = GridIndex::new(&points, eps);
            for i in 0..points.len() {
                assert_eq!(grid.neighbors(i), scan.neighbors(i), "eps={eps} i={i}");
            }
        }
    }

    #[test]
    fn grid_matches_linear_scan_on_scatter() {
        let points = scatter(400, 7);
        for eps in [0.05, 0.4, 2.0] {
            let scan = LinearScan::new(&points, eps);
            let grid = GridIndex::new(&points, eps);
            for i in 0..points.len() {
                assert_eq!(grid.neighbors(i), scan.neighbors(i), "eps={eps} i={i}");
            }
        }
    }

    #[test]
    fn grid_buckets_far_points_apart() {
        let points = sample_points();
        let grid = GridIndex::new(&points, 0.1);
        assert!(grid.cell_count() > 1);
        assert_eq!(grid.len(), points.len());
    }
}
