use std::fmt;

// ---------------------------------------------------------------------------
// Point – one geographic coordinate
// ---------------------------------------------------------------------------

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Point { lon, lat }
    }
}

// ---------------------------------------------------------------------------
// Label – per-point clustering outcome
// ---------------------------------------------------------------------------

/// Sequential cluster identifier, starting at 0 in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub usize);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome for a single point: outlier, or member of exactly one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Label {
    #[default]
    Noise,
    Cluster(ClusterId),
}

impl Label {
    pub fn is_noise(&self) -> bool {
        matches!(self, Label::Noise)
    }

    pub fn cluster(&self) -> Option<ClusterId> {
        match self {
            Label::Cluster(id) => Some(*id),
            Label::Noise => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Noise => write!(f, "noise"),
            Label::Cluster(id) => write!(f, "{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cluster / Clustering – engine output
// ---------------------------------------------------------------------------

/// A cluster and its members in the order expansion discovered them.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    pub members: Vec<usize>,
}

/// The complete result of one DBSCAN run.
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    /// One label per input point, in input order.
    pub labels: Vec<Label>,
    /// Clusters ordered by id.
    pub clusters: Vec<Cluster>,
}

impl Clustering {
    /// Number of input points.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Indices of points left as noise after expansion reclaimed border points.
    pub fn noise_indices(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_noise())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_noise()).count()
    }
}
