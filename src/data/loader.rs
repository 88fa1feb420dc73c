use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};

use super::model::{PointTable, SourceFormat, SourceRecord};
use crate::cluster::Point;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load points from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "latitude": ..., "longitude": ..., ...other }, ...]`
/// * anything else – CSV with `latitude,longitude` in the first two columns
pub fn load_file(path: &Path) -> Result<PointTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text)?
        }
        _ => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            read_csv(file)?
        }
    };

    log::info!(
        "read {} points from {} ({} rows skipped)",
        table.len(),
        path.display(),
        table.skipped_rows()
    );
    Ok(table)
}

/// Parse a coordinate field; only finite numbers count.
fn parse_coordinate(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: optional header row, then `latitude,longitude[,...]`.
///
/// The first row is a header when its first field is not a number. Rows
/// with fewer than two fields or non-numeric coordinates are kept for
/// bookkeeping but produce no point. Extra columns are preserved.
pub fn read_csv<R: Read>(reader: R) -> Result<PointTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    let mut table = PointTable::new(SourceFormat::Csv);
    let mut rows = rows.into_iter();
    let mut first = rows.next();

    if let Some(row) = &first {
        let numeric = row.first().and_then(|f| f.parse::<f64>().ok()).is_some();
        if !numeric {
            log::debug!("treating first row as header: {row:?}");
            table.header = first.take();
        }
    }

    for (row_no, row) in first.into_iter().chain(rows).enumerate() {
        let point = csv_point(&row);
        if point.is_none() {
            log::debug!("skipping data row {row_no}: no usable latitude,longitude in {row:?}");
        }
        table.push(SourceRecord::Fields(row), point);
    }

    Ok(table)
}

fn csv_point(row: &[String]) -> Option<Point> {
    match row {
        [lat, lon, ..] => Some(Point::new(parse_coordinate(lon)?, parse_coordinate(lat)?)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

const LAT_KEYS: [&str; 2] = ["latitude", "lat"];
const LON_KEYS: [&str; 3] = ["longitude", "lon", "lng"];

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "latitude": 59.955982, "longitude": 30.244759, "id": "a" },
///   { "lat": "59.96698", "lng": "30.244358" }
/// ]
/// ```
///
/// Coordinates may be numbers or numeric strings. Objects without both
/// coordinates are kept but produce no point.
pub fn parse_json(text: &str) -> Result<PointTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut table = PointTable::new(SourceFormat::Json);
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let point = json_point(obj);
        if point.is_none() {
            log::debug!("skipping JSON row {i}: no usable latitude/longitude");
        }
        table.push(SourceRecord::Object(obj.clone()), point);
    }

    Ok(table)
}

fn json_point(obj: &Map<String, JsonValue>) -> Option<Point> {
    let lat = json_coordinate(obj, &LAT_KEYS)?;
    let lon = json_coordinate(obj, &LON_KEYS)?;
    Some(Point::new(lon, lat))
}

fn json_coordinate(obj: &Map<String, JsonValue>, keys: &[&str]) -> Option<f64> {
    let val = keys.iter().find_map(|k| obj.get(*k))?;
    match val {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => parse_coordinate(s),
        _ => None,
    }
}
