use std::collections::VecDeque;

use thiserror::Error;

use super::model::{Cluster, ClusterId, Clustering, Label, Point};
use super::neighbors::{GridIndex, LinearScan, NeighborQuery};

// DBSCAN (Ester et al., 1996):
//
//    for each unvisited point P
//       mark P visited
//       N = regionQuery(P, eps)
//       if |N| < minPts: P is (tentatively) noise
//       else: start cluster C at P and expand breadth-first over N,
//             joining the neighbourhood of every core point reached and
//             claiming every point that has no cluster yet.

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("eps must be a finite radius greater than 0 km, got {0}")]
    InvalidEps(f64),
    #[error("min_points must be at least 1, got {0}")]
    InvalidMinPoints(usize),
}

/// Validated DBSCAN parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanParams {
    eps: f64,
    min_points: usize,
}

impl DbscanParams {
    /// `eps` is the neighbourhood radius in kilometres; `min_points` counts
    /// the point itself.
    pub fn new(eps: f64, min_points: usize) -> Result<Self, ParamsError> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(ParamsError::InvalidEps(eps));
        }
        if min_points < 1 {
            return Err(ParamsError::InvalidMinPoints(min_points));
        }
        Ok(DbscanParams { eps, min_points })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }
}

/// Which neighbourhood search backs a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    /// Check every point for every query.
    Scan,
    /// Uniform grid, same results in near-constant time per query.
    #[default]
    Grid,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Dbscan {
    params: DbscanParams,
}

impl Dbscan {
    pub fn new(params: DbscanParams) -> Self {
        Dbscan { params }
    }

    pub fn params(&self) -> &DbscanParams {
        &self.params
    }

    /// Cluster `points`, building the requested neighbourhood index first.
    pub fn cluster_points(&self, points: &[Point], index: IndexKind) -> Clustering {
        match index {
            IndexKind::Scan => self.fit(&LinearScan::new(points, self.params.eps)),
            IndexKind::Grid => self.fit(&GridIndex::new(points, self.params.eps)),
        }
    }

    /// Run DBSCAN over every point covered by `query`.
    ///
    /// Points are scanned in index order and neighbourhoods come back
    /// ascending, so the result is fully determined by the input order.
    pub fn fit<Q: NeighborQuery + ?Sized>(&self, query: &Q) -> Clustering {
        let n = query.len();
        let min_points = self.params.min_points;

        let mut visited = vec![false; n];
        let mut labels = vec![Label::Noise; n];
        // A point is queued at most once over the whole run: every queued
        // point is claimed by the cluster that queued it, unless it already
        // belonged to one.
        let mut queued = vec![false; n];
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();

        for p in 0..n {
            if visited[p] {
                continue;
            }
            visited[p] = true;

            let seeds = query.neighbors(p);
            if seeds.len() < min_points {
                continue;
            }

            let id = ClusterId(clusters.len());
            labels[p] = Label::Cluster(id);
            queued[p] = true;
            let mut members = vec![p];
            push_unqueued(&mut queue, &mut queued, &seeds);

            while let Some(q) = queue.pop_front() {
                if !visited[q] {
                    visited[q] = true;
                    let reach = query.neighbors(q);
                    if reach.len() >= min_points {
                        push_unqueued(&mut queue, &mut queued, &reach);
                    }
                }
                if labels[q].is_noise() {
                    labels[q] = Label::Cluster(id);
                    members.push(q);
                }
            }

            log::trace!("cluster {id}: {} members, seeded at {p}", members.len());
            clusters.push(Cluster { id, members });
        }

        Clustering { labels, clusters }
    }
}

fn push_unqueued(queue: &mut VecDeque<usize>, queued: &mut [bool], indices: &[usize]) {
    for &j in indices {
        if !queued[j] {
            queued[j] = true;
            queue.push_back(j);
        }
    }
}
