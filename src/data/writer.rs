use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value as JsonValue};

use super::model::{PointTable, SourceFormat, SourceRecord};

/// Write the retained rows to `path` in the format they were read in.
///
/// * CSV – the header (if any) followed by each retained row, all columns.
/// * JSON – a pretty-printed array of the retained objects.
pub fn write_file(path: &Path, table: &PointTable, retained: &[usize]) -> Result<()> {
    let written = match table.format {
        SourceFormat::Csv => write_csv(path, table, retained),
        SourceFormat::Json => write_json(path, table, retained),
    };
    written.with_context(|| format!("writing {}", path.display()))?;

    log::info!("wrote {} rows to {}", retained.len(), path.display());
    Ok(())
}

fn write_csv(path: &Path, table: &PointTable, retained: &[usize]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("creating CSV file")?;

    if let Some(header) = &table.header {
        writer.write_record(header)?;
    }
    for &i in retained {
        match table.record_of(i) {
            SourceRecord::Fields(fields) => writer.write_record(fields)?,
            SourceRecord::Object(_) => bail!("point {i} has no CSV record"),
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, table: &PointTable, retained: &[usize]) -> Result<()> {
    let objects: Vec<&Map<String, JsonValue>> = retained
        .iter()
        .map(|&i| match table.record_of(i) {
            SourceRecord::Object(obj) => Ok(obj),
            SourceRecord::Fields(_) => bail!("point {i} has no JSON record"),
        })
        .collect::<Result<_>>()?;

    let file = File::create(path).context("creating JSON file")?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &objects)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write one `latitude,longitude` line per retained point.
///
/// CSV rows echo their first two fields as read; JSON rows print the parsed
/// coordinates.
pub fn write_lines<W: Write>(mut out: W, table: &PointTable, retained: &[usize]) -> Result<()> {
    for &i in retained {
        match table.record_of(i) {
            SourceRecord::Fields(fields) => writeln!(out, "{},{}", fields[0], fields[1])?,
            SourceRecord::Object(_) => {
                let p = table.points[i];
                writeln!(out, "{},{}", p.lat, p.lon)?
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_json, read_csv};

    #[test]
    fn lines_echo_raw_coordinates() {
        let table = read_csv("lat,lon,name\n1.50,2.0,a\n3.0,4.000,b\n".as_bytes()).unwrap();
        let mut out = Vec::new();
        write_lines(&mut out, &table, &[1]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3.0,4.000\n");
    }

    #[test]
    fn lines_skip_rows_without_points() {
        let table = read_csv("1.0,2.0\nbroken\n3.0,4.0\n".as_bytes()).unwrap();
        let mut out = Vec::new();
        write_lines(&mut out, &table, &[0, 1]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1.0,2.0\n3.0,4.0\n");
    }

    #[test]
    fn lines_from_json_use_parsed_values() {
        let table = parse_json(r#"[{"lat": 1.5, "lon": 2.25}]"#).unwrap();
        let mut out = Vec::new();
        write_lines(&mut out, &table, &[0]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1.5,2.25\n");
    }

    #[test]
    fn csv_file_keeps_header_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = read_csv("lat,lon,name\n1.0,2.0,a\n3.0,4.0,b\n5.0,6.0,c\n".as_bytes()).unwrap();

        write_file(&path, &table, &[0, 2]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "lat,lon,name\n1.0,2.0,a\n5.0,6.0,c\n");
    }

    #[test]
    fn json_file_keeps_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let table = parse_json(r#"[{"lat": 1, "lon": 2, "id": "x"}, {"lat": 3, "lon": 4, "id": "y"}]"#)
            .unwrap();

        write_file(&path, &table, &[1]).unwrap();
        let back: JsonValue = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, serde_json::json!([{"lat": 3, "lon": 4, "id": "y"}]));
    }
}
