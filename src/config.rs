//! Job arguments.
//!
//! Arguments use the hosting platform's spelling (`--JOB_NAME`, `--input_path`, `--output_path`,
//! `--file_format`) so existing job definitions keep working:
//!
//! ```text
//! column-normalizer --JOB_NAME nightly --input_path raw/users.csv \
//!     --output_path clean/users.parquet --file_format parquet
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::format::OutputFormat;
use crate::ingestion::ReadOptions;
use crate::output::{OutputLayout, WriteOptions};

/// Job name used when `--JOB_NAME` is not given.
pub const DEFAULT_JOB_NAME: &str = "column-normalizer";

/// Read a delimited file, normalize its column names, and write it as CSV or Parquet.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "column-normalizer", version)]
pub struct JobArgs {
    /// Name reported in job events.
    #[arg(long = "JOB_NAME", default_value = DEFAULT_JOB_NAME)]
    pub job_name: String,

    /// Source file, directory of files, or glob pattern. Must have a header row.
    #[arg(long = "input_path")]
    pub input_path: PathBuf,

    /// Destination. Prior contents are replaced.
    #[arg(long = "output_path")]
    pub output_path: PathBuf,

    /// `csv` or `parquet` (case-insensitive). Anything else is written as csv with a warning.
    #[arg(long = "file_format")]
    pub file_format: Option<String>,

    /// Write a single file, or a directory with one part file and a `_SUCCESS` marker.
    #[arg(long, value_enum, default_value_t = OutputLayout::File)]
    pub layout: OutputLayout,

    /// Field delimiter for both input and CSV output. `\t` or `tab` for tabs.
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Read every column as text instead of inferring numeric and boolean types.
    #[arg(long = "no-infer-schema")]
    pub no_infer_schema: bool,

    /// Also append job events as JSON lines to this file.
    #[arg(long = "event-log")]
    pub event_log: Option<PathBuf>,
}

impl JobArgs {
    /// Arguments for a run with every option at its default.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            job_name: DEFAULT_JOB_NAME.to_string(),
            input_path: input_path.into(),
            output_path: output_path.into(),
            file_format: None,
            layout: OutputLayout::File,
            delimiter: b',',
            no_infer_schema: false,
            event_log: None,
        }
    }

    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = job_name.into();
        self
    }

    pub fn with_file_format(mut self, file_format: impl Into<String>) -> Self {
        self.file_format = Some(file_format.into());
        self
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// The requested format, defaulting to csv when absent.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::parse_or_default(self.file_format.as_deref())
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            delimiter: self.delimiter,
            infer_schema: !self.no_infer_schema,
            schema: None,
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            layout: self.layout,
            delimiter: self.delimiter,
            ..WriteOptions::default()
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_style_arguments() {
        let args = JobArgs::try_parse_from([
            "column-normalizer",
            "--JOB_NAME",
            "nightly",
            "--input_path",
            "raw/users.csv",
            "--output_path=clean/users",
            "--file_format",
            "PARQUET",
        ])
        .unwrap();

        assert_eq!(args.job_name, "nightly");
        assert_eq!(args.input_path, PathBuf::from("raw/users.csv"));
        assert_eq!(args.output_path, PathBuf::from("clean/users"));
        assert_eq!(args.output_format(), OutputFormat::Parquet);
        assert_eq!(args.layout, OutputLayout::File);
    }

    #[test]
    fn file_format_defaults_to_csv() {
        let args =
            JobArgs::try_parse_from(["x", "--input_path", "a.csv", "--output_path", "b.csv"])
                .unwrap();
        assert_eq!(args.file_format, None);
        assert_eq!(args.output_format(), OutputFormat::Csv);
        assert_eq!(args.job_name, DEFAULT_JOB_NAME);
        assert_eq!(args, JobArgs::new("a.csv", "b.csv"));
    }

    #[test]
    fn missing_output_path_is_a_usage_error() {
        let err = JobArgs::try_parse_from(["x", "--input_path", "a.csv"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn options_flow_into_read_and_write_options() {
        let args = JobArgs::try_parse_from([
            "x",
            "--input_path",
            "a.tsv",
            "--output_path",
            "out",
            "--delimiter",
            "tab",
            "--layout",
            "directory",
            "--no-infer-schema",
        ])
        .unwrap();

        let read = args.read_options();
        assert_eq!(read.delimiter, b'\t');
        assert!(!read.infer_schema);
        let write = args.write_options();
        assert_eq!(write.layout, OutputLayout::Directory);
        assert_eq!(write.delimiter, b'\t');
    }

    #[test]
    fn rejects_multi_character_delimiters() {
        assert!(parse_delimiter("::").is_err());
        assert_eq!(parse_delimiter(";"), Ok(b';'));
    }
}
