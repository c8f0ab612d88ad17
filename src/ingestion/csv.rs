//! CSV reading with per-column type inference.

use std::path::Path;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::ReadOptions;

/// Raw header + records of one or more CSV sources, before typing.
#[derive(Debug, Default)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) records: Vec<csv::StringRecord>,
}

impl RawTable {
    /// Append `other`, which must have the same column count.
    pub(crate) fn append(&mut self, other: RawTable, source: &Path) -> ProcessingResult<()> {
        if other.headers.len() != self.headers.len() {
            return Err(ProcessingError::SchemaMismatch {
                message: format!(
                    "{} has {} columns but the first input has {}. headers={:?}",
                    source.display(),
                    other.headers.len(),
                    self.headers.len(),
                    other.headers
                ),
            });
        }
        self.records.extend(other.records);
        Ok(())
    }
}

/// Read a single CSV file into a [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers; header names are kept verbatim.
/// - Every record must have as many fields as the header.
/// - Column types come from [`ReadOptions::schema`] if set, otherwise from inference (or all
///   [`DataType::Utf8`] when [`ReadOptions::infer_schema`] is off).
pub fn read_csv_from_path(path: impl AsRef<Path>, options: &ReadOptions) -> ProcessingResult<DataSet> {
    let raw = read_raw_from_path(path.as_ref(), options)?;
    type_raw_table(raw, options)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    options: &ReadOptions,
) -> ProcessingResult<DataSet> {
    let raw = read_raw(rdr)?;
    type_raw_table(raw, options)
}

pub(crate) fn read_raw_from_path(path: &Path, options: &ReadOptions) -> ProcessingResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_path(path)?;
    read_raw(&mut rdr)
}

fn read_raw<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ProcessingResult<RawTable> {
    let headers = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result?);
    }
    Ok(RawTable { headers, records })
}

pub(crate) fn type_raw_table(raw: RawTable, options: &ReadOptions) -> ProcessingResult<DataSet> {
    match &options.schema {
        Some(schema) => apply_schema(raw, schema),
        None => {
            let fields = raw
                .headers
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let data_type = if options.infer_schema {
                        infer_column_type(raw.records.iter().map(|r| r.get(idx).unwrap_or("")))
                    } else {
                        DataType::Utf8
                    };
                    Field::new(name.clone(), data_type)
                })
                .collect();
            let schema = Schema::new(fields);
            let col_idxs: Vec<usize> = (0..schema.len()).collect();
            build_rows(raw, schema, &col_idxs)
        }
    }
}

fn apply_schema(raw: RawTable, schema: &Schema) -> ProcessingResult<DataSet> {
    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.len());
    for field in &schema.fields {
        match raw.headers.iter().position(|h| *h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(ProcessingError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        raw.headers,
                        field = field.name
                    ),
                });
            }
        }
    }
    build_rows(raw, schema.clone(), &col_idxs)
}

fn build_rows(raw: RawTable, schema: Schema, col_idxs: &[usize]) -> ProcessingResult<DataSet> {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(raw.records.len());
    for (row_idx0, record) in raw.records.iter().enumerate() {
        // 1-based line number for users; falls back to +2 because the header is row 1.
        let user_row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_idx0 + 2);

        let mut row: Vec<Value> = Vec::with_capacity(schema.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs) {
            let raw_value = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw_value)?);
        }
        rows.push(row);
    }
    Ok(DataSet::new(schema, rows))
}

/// Narrowest type that parses every non-empty value: `Int64`, then `Float64`, then `Bool`,
/// else `Utf8`. A column with no non-empty values is `Utf8`.
pub fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> DataType {
    let mut candidate: Option<DataType> = None;
    for raw in values {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let kind = classify(trimmed);
        candidate = Some(match candidate {
            None => kind,
            Some(current) => widen(current, kind),
        });
        if candidate == Some(DataType::Utf8) {
            break;
        }
    }
    candidate.unwrap_or(DataType::Utf8)
}

fn classify(trimmed: &str) -> DataType {
    if trimmed.parse::<i64>().is_ok() {
        DataType::Int64
    } else if trimmed.parse::<f64>().is_ok() {
        DataType::Float64
    } else if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

fn widen(a: DataType, b: DataType) -> DataType {
    match (a, b) {
        (a, b) if a == b => a,
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> ProcessingResult<Value> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    let trimmed = raw.trim();

    let parse_err = |message: String| ProcessingError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        // Blank cells in typed columns are missing values.
        _ if trimmed.is_empty() => Ok(Value::Null),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_err),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
