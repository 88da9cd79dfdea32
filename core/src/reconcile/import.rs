use crate::catalog::model::{CitationRecord, FIELD_PRINTABLE, FIELD_YEAR, LIST_FIELDS};
use crate::error::{CoreError, CoreResult};
use serde_json::{Map, Number, Value};

/// Separator between elements of a sequence column in delimited text.
pub const LIST_SEPARATOR: char = '|';

/// Parse pasted JSON: a top-level array of objects.
pub fn parse_json_records(json_str: &str) -> CoreResult<Vec<CitationRecord>> {
    let raw: Value = serde_json::from_str(json_str)
        .map_err(|e| CoreError::ParseFailure(format!("invalid JSON: {}", e)))?;

    let Value::Array(items) = raw else {
        return Err(CoreError::ParseFailure(
            "expected a JSON array of citation objects".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => Ok(CitationRecord::from_map(map)),
            _ => Err(CoreError::ParseFailure(format!(
                "entry {} is not an object",
                idx + 1
            ))),
        })
        .collect()
}

/// Parse header-first comma-separated text into records.
///
/// Sequence columns split on `|`, `year` becomes a number when it parses
/// as one, and `printable` is true only for a literal "true". Short rows are
/// padded with empty strings; surplus cells past the header are dropped.
pub fn parse_delimited_records(text: &str) -> CoreResult<Vec<CitationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CoreError::ParseFailure(format!("failed to read header row: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(CoreError::ParseFailure(
            "delimited text has no header row".to_string(),
        ));
    }

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            CoreError::ParseFailure(format!("failed to read row {}: {}", row_idx + 2, e))
        })?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut map = Map::new();
        for (col, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let cell = row.get(col).unwrap_or("");
            map.insert(header.clone(), cell_value(header, cell, row_idx + 2));
        }
        records.push(CitationRecord::from_map(map));
    }

    tracing::debug!(
        columns = headers.len(),
        rows = records.len(),
        "parsed delimited citations"
    );
    Ok(records)
}

fn cell_value(header: &str, cell: &str, line: usize) -> Value {
    if LIST_FIELDS.contains(&header) {
        return Value::Array(
            cell.split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| Value::String(part.to_string()))
                .collect(),
        );
    }
    match header {
        FIELD_YEAR => parse_year(cell, line),
        FIELD_PRINTABLE => Value::Bool(cell.trim().to_lowercase() == "true"),
        _ => Value::String(cell.to_string()),
    }
}

fn parse_year(cell: &str, line: usize) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    tracing::warn!(line, value = trimmed, "year is not numeric, keeping text");
    Value::String(trimmed.to_string())
}
