//! Survey tables: Census Data API JSON and CSV.

use std::collections::BTreeSet;
use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value;
use tracing::{debug, warn};

use geostat_model::{RawRow, RawValue};

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Parses a Census Data API response.
///
/// The body is an array of arrays: a header row of column names followed by
/// one row per geography. The geography code is the last column; the other
/// columns become the row's values. `origin` is only used in error messages.
pub fn parse_census_json(contents: &str, origin: &Path) -> Result<Vec<RawRow>> {
    let value: Value = serde_json::from_str(contents).map_err(|e| IngestError::Json {
        path: origin.to_path_buf(),
        source: e,
    })?;
    census_rows(&value, origin)
}

pub fn census_rows(value: &Value, origin: &Path) -> Result<Vec<RawRow>> {
    let table = value
        .as_array()
        .ok_or_else(|| IngestError::invalid_table(origin, "expected an array of rows"))?;
    let Some((header, records)) = table.split_first() else {
        return Err(IngestError::invalid_table(origin, "missing header row"));
    };
    let headers: Vec<String> = header
        .as_array()
        .ok_or_else(|| IngestError::invalid_table(origin, "header row is not an array"))?
        .iter()
        .map(|cell| match cell {
            Value::String(name) => normalize_header(name),
            other => normalize_header(&other.to_string()),
        })
        .collect();
    if headers.is_empty() {
        return Err(IngestError::invalid_table(origin, "header row is empty"));
    }
    let geo_index = headers.len() - 1;

    let mut rows = Vec::with_capacity(records.len());
    for (line, record) in records.iter().enumerate() {
        let cells = record.as_array().ok_or_else(|| {
            IngestError::invalid_table(origin, format!("row {} is not an array", line + 1))
        })?;
        if cells.len() != headers.len() {
            return Err(IngestError::invalid_table(
                origin,
                format!(
                    "row {} has {} cells, header has {}",
                    line + 1,
                    cells.len(),
                    headers.len()
                ),
            ));
        }
        let geo_code = match &cells[geo_index] {
            Value::String(code) => code.trim().to_string(),
            Value::Number(code) => code.to_string(),
            _ => {
                return Err(IngestError::invalid_table(
                    origin,
                    format!("row {} has no geography code", line + 1),
                ));
            }
        };
        let mut row = RawRow::new(geo_code);
        for (name, cell) in headers.iter().zip(cells).take(geo_index) {
            row.insert(name.clone(), raw_value(cell));
        }
        rows.push(row);
    }
    debug!(
        path = %origin.display(),
        columns = headers.len(),
        rows = rows.len(),
        geo_column = %headers[geo_index],
        "parsed census table"
    );
    Ok(rows)
}

fn raw_value(cell: &Value) -> RawValue {
    match cell {
        Value::Null => RawValue::Null,
        Value::Number(number) => number
            .as_f64()
            .map_or_else(|| RawValue::Text(number.to_string()), RawValue::Number),
        Value::String(text) => RawValue::Text(text.clone()),
        other => RawValue::Text(other.to_string()),
    }
}

/// Reads a CSV table with a header row.
///
/// `geo_column` names the geography-code column; without it the last column
/// is used, matching the Census layout.
pub fn read_csv_rows(path: &Path, geo_column: Option<&str>) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(normalize_header)
        .collect();
    let geo_index = match geo_column {
        Some(name) => headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| {
                IngestError::invalid_table(path, format!("missing geography column {name}"))
            })?,
        None if headers.is_empty() => {
            return Err(IngestError::invalid_table(path, "header row is empty"));
        }
        None => headers.len() - 1,
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let geo_code = record.get(geo_index).unwrap_or("").trim();
        if geo_code.is_empty() {
            warn!(path = %path.display(), "skipping CSV record without a geography code");
            continue;
        }
        let mut row = RawRow::new(geo_code);
        for (idx, (name, cell)) in headers.iter().zip(record.iter()).enumerate() {
            if idx != geo_index {
                row.insert(name.clone(), RawValue::from(cell));
            }
        }
        rows.push(row);
    }
    debug!(path = %path.display(), rows = rows.len(), "read CSV table");
    Ok(rows)
}

/// Requested codes absent from every row's columns.
pub fn missing_columns(rows: &[RawRow], codes: &[String]) -> Vec<String> {
    let present: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.values.keys().map(String::as_str))
        .collect();
    codes
        .iter()
        .filter(|code| !present.contains(code.as_str()))
        .cloned()
        .collect()
}
