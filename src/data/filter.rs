use std::collections::HashSet;

use crate::cluster::{Label, Point};

// ---------------------------------------------------------------------------
// Run compression: which points survive the reduction
// ---------------------------------------------------------------------------

/// Return indices of points to keep, scanning labels in input order.
///
/// A point is kept when:
/// * it is the first point, or
/// * it is noise, or
/// * its label differs from the previous point's label (it opens a new run).
///
/// Runs are taken over the input order, so a cluster whose members are
/// interleaved with other labels is kept once per run, not once overall.
pub fn retained_indices(labels: &[Label]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|&(i, label)| i == 0 || label.is_noise() || *label != labels[i - 1])
        .map(|(i, _)| i)
        .collect()
}

/// Drop retained indices whose coordinates exactly repeat an earlier kept point.
///
/// `retained` must be ascending, as returned by [`retained_indices`].
pub fn skip_repeated_coordinates(points: &[Point], retained: &[usize]) -> Vec<usize> {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(retained.len());
    retained
        .iter()
        .copied()
        .filter(|&i| seen.insert(coordinate_key(&points[i])))
        .collect()
}

fn coordinate_key(p: &Point) -> (u64, u64) {
    // `+ 0.0` folds -0.0 into 0.0 so the key agrees with `==`.
    ((p.lon + 0.0).to_bits(), (p.lat + 0.0).to_bits())
}
