use serde_json::{Map, Value as JsonValue};

use crate::cluster::Point;

// ---------------------------------------------------------------------------
// SourceRecord – one input row kept verbatim for output
// ---------------------------------------------------------------------------

/// Which loader produced a table; the writer answers in the same format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

/// A raw input row, preserved so retained rows can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    /// A CSV record, all columns as read.
    Fields(Vec<String>),
    /// A JSON object from the top-level array.
    Object(Map<String, JsonValue>),
}

// ---------------------------------------------------------------------------
// PointTable – the complete loaded input
// ---------------------------------------------------------------------------

/// Parsed input: the raw rows plus the points extracted from them.
///
/// `points[k]` was read from `records[point_rows[k]]`. Rows without usable
/// coordinates stay in `records` but have no point.
#[derive(Debug, Clone)]
pub struct PointTable {
    pub format: SourceFormat,
    /// CSV header row, when the first row was not numeric.
    pub header: Option<Vec<String>>,
    /// Data rows in file order (header excluded).
    pub records: Vec<SourceRecord>,
    /// Points in input order; this order is what the clustering indexes.
    pub points: Vec<Point>,
    /// For each point, the index of its row in `records`.
    pub point_rows: Vec<usize>,
}

impl PointTable {
    pub fn new(format: SourceFormat) -> Self {
        PointTable {
            format,
            header: None,
            records: Vec::new(),
            points: Vec::new(),
            point_rows: Vec::new(),
        }
    }

    /// Append a data row, and its point when it has one.
    pub fn push(&mut self, record: SourceRecord, point: Option<Point>) {
        if let Some(p) = point {
            self.points.push(p);
            self.point_rows.push(self.records.len());
        }
        self.records.push(record);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point could be read.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rows that were read but carried no usable coordinates.
    pub fn skipped_rows(&self) -> usize {
        self.records.len() - self.points.len()
    }

    /// The source row a point came from.
    pub fn record_of(&self, point: usize) -> &SourceRecord {
        &self.records[self.point_rows[point]]
    }
}
