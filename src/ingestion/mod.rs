//! Reading the delimited source into a [`crate::types::DataSet`].
//!
//! Most callers should use [`read_input`], which:
//!
//! - resolves the input path into one or more files (see [`source`])
//! - reads every file's header + records with the `csv` crate
//! - concatenates the records and assigns column types (see [`csv::infer_column_type`])

pub mod csv;
pub mod source;

use std::path::Path;

use crate::error::ProcessingResult;
use crate::types::{DataSet, Schema};

pub use self::csv::{infer_column_type, read_csv_from_path, read_csv_from_reader};
pub use source::resolve_input_files;

/// Options controlling how the input is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Infer `Int64`/`Float64`/`Bool` columns. When off, every column is `Utf8`.
    pub infer_schema: bool,
    /// Explicit schema. Columns are selected by header name, in schema order, and inference is
    /// skipped.
    pub schema: Option<Schema>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_schema: true,
            schema: None,
        }
    }
}

/// Read every file behind `input` into one dataset.
///
/// The first file's header defines the column names; every other file must have the same
/// number of columns.
pub fn read_input(input: impl AsRef<Path>, options: &ReadOptions) -> ProcessingResult<DataSet> {
    let files = resolve_input_files(input)?;

    let mut files = files.into_iter();
    let mut table = match files.next() {
        Some(first) => self::csv::read_raw_from_path(&first, options)?,
        None => self::csv::RawTable::default(),
    };
    for file in files {
        let next = self::csv::read_raw_from_path(&file, options)?;
        table.append(next, &file)?;
    }

    self::csv::type_raw_table(table, options)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::ProcessingError;
    use crate::types::{DataType, Value};

    #[test]
    fn directory_input_concatenates_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "Id,Score\n1,2\n").unwrap();
        fs::write(dir.path().join("b.csv"), "Id,Score\n3,4.5\n").unwrap();

        let ds = read_input(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_names(), vec!["Id", "Score"]);
        assert_eq!(ds.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(ds.rows[0][1], Value::Float64(2.0));
        assert_eq!(ds.rows[1][0], Value::Int64(3));
    }

    #[test]
    fn header_count_mismatch_across_files_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "a,b\n1,2\n").unwrap();
        fs::write(dir.path().join("b.csv"), "a\n3\n").unwrap();

        let err = read_input(dir.path(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, ProcessingError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("has 1 columns"));
    }

    #[test]
    fn custom_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semi.csv");
        fs::write(&path, "A B;C/D\n1;x\n").unwrap();

        let opts = ReadOptions {
            delimiter: b';',
            ..Default::default()
        };
        let ds = read_input(&path, &opts).unwrap();
        assert_eq!(ds.column_names(), vec!["A B", "C/D"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_input("tests/fixtures/does_not_exist.csv", &ReadOptions::default())
            .unwrap_err();
        assert!(err.is_io(), "{err}");
    }
}
