//! `column-normalizer` reads a delimited file, normalizes its column names, and writes the result
//! back as CSV or Parquet.
//!
//! The whole job is a linear pipeline:
//!
//! 1. **read** ([`ingestion::read_input`]): a CSV file, a directory of CSV files, or a glob
//!    pattern, into an in-memory [`types::DataSet`] with inferred column types
//! 2. **normalize** ([`normalize::normalize_columns`]): lowercase every column name and replace
//!    `' '` and `'/'` with `_`
//! 3. **write** ([`output::write_dataset`]): dispatch on the requested [`format::OutputFormat`],
//!    replacing whatever was at the destination
//!
//! [`job::run_job`] runs all three against an explicit [`job::JobSession`] and returns either the
//! [`output::WrittenOutput`] or a [`JobFailure`] tagged with the failing stage.
//!
//! ## Normalization
//!
//! ```rust
//! use column_normalizer::normalize::normalize_column_names;
//!
//! let names = normalize_column_names(&["User Name", "Sign Up/Date", "AGE"]);
//! assert_eq!(names, vec!["user_name", "sign_up_date", "age"]);
//! ```
//!
//! ## Format dispatch
//!
//! | requested (any case) | writer |
//! |---|---|
//! | `csv` or absent | CSV with header row |
//! | `parquet` | Parquet |
//! | anything else | CSV with header row, after an unsupported-format warning |
//!
//! ```rust
//! use column_normalizer::format::{OutputFormat, WriterKind};
//!
//! assert_eq!(OutputFormat::parse("PARQUET").writer(), WriterKind::Parquet);
//! assert_eq!(OutputFormat::parse("xml").writer(), WriterKind::Csv);
//! ```
//!
//! ## Modules
//!
//! - [`config`]: job arguments
//! - [`ingestion`]: input resolution and CSV reading
//! - [`normalize`]: column-name normalization
//! - [`format`]: output format parsing and writer selection
//! - [`output`]: CSV/Parquet writers with overwrite semantics
//! - [`job`]: session object and pipeline
//! - [`observability`]: job events and observers
//! - [`types`]: in-memory dataset types
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod format;
pub mod ingestion;
pub mod job;
pub mod normalize;
pub mod observability;
pub mod output;
pub mod types;

pub use error::{JobFailure, JobResult, JobStage, ProcessingError, ProcessingResult};
