//! Output format parsing and writer selection.
//!
//! Any string is a valid requested format. Only `parquet` (case-insensitive) selects the Parquet
//! writer; `csv` and every unrecognized value select the CSV writer. Unrecognized values are
//! reported as a warning by [`crate::output::write_dataset`] before falling back.

use std::fmt;

use serde::Serialize;

/// Format used when the caller does not request one.
pub const DEFAULT_FILE_FORMAT: &str = "csv";

/// A requested output format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Apache Parquet.
    Parquet,
    /// Anything else, as given by the caller. Written as CSV.
    Other(String),
}

impl OutputFormat {
    /// Parse a requested format (case-insensitive). Never fails.
    pub fn parse(requested: &str) -> Self {
        match requested.to_lowercase().as_str() {
            "csv" => Self::Csv,
            "parquet" => Self::Parquet,
            _ => Self::Other(requested.to_string()),
        }
    }

    /// Parse an optional requested format, defaulting to [`DEFAULT_FILE_FORMAT`].
    pub fn parse_or_default(requested: Option<&str>) -> Self {
        Self::parse(requested.unwrap_or(DEFAULT_FILE_FORMAT))
    }

    /// The writer this format dispatches to.
    pub fn writer(&self) -> WriterKind {
        match self {
            Self::Parquet => WriterKind::Parquet,
            Self::Csv | Self::Other(_) => WriterKind::Csv,
        }
    }

    /// True when the format was not recognized and falls back to CSV.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Parquet => f.write_str("parquet"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Writer actually used for an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterKind {
    Csv,
    Parquet,
}

impl WriterKind {
    /// File extension used for part files in directory layout.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for WriterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(OutputFormat::parse("CSV"), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse("PARQUET"), OutputFormat::Parquet);
        assert_eq!(OutputFormat::parse("Parquet"), OutputFormat::Parquet);
        assert_eq!(
            OutputFormat::parse("xml"),
            OutputFormat::Other("xml".to_string())
        );
    }

    #[test]
    fn only_parquet_selects_the_parquet_writer() {
        for f in ["csv", "CSV", "xml", "", " parquet", "parquet ", "orc", "json", "pq"] {
            assert_eq!(OutputFormat::parse(f).writer(), WriterKind::Csv, "format {f:?}");
        }
        for f in ["parquet", "PARQUET", "pArQuEt"] {
            assert_eq!(OutputFormat::parse(f).writer(), WriterKind::Parquet, "format {f:?}");
        }
    }

    #[test]
    fn absent_format_defaults_to_csv_without_fallback() {
        let f = OutputFormat::parse_or_default(None);
        assert_eq!(f, OutputFormat::Csv);
        assert_eq!(OutputFormat::default(), f);
        assert!(!f.is_fallback());
        assert!(OutputFormat::parse("xml").is_fallback());
    }

    #[test]
    fn other_keeps_the_caller_spelling() {
        assert_eq!(OutputFormat::parse("XmL").to_string(), "XmL");
    }
}
