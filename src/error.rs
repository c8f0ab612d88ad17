use std::fmt;

use thiserror::Error;

/// Convenience result type for read/normalize/write operations.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Convenience result type for a whole job run.
pub type JobResult<T> = Result<T, JobFailure>;

/// Error type returned by the reading and writing functions.
///
/// Every variant is a processing failure; the variants only record where the cause came from.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet write error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input path looked like a glob pattern but could not be parsed as one.
    #[error("invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A directory or glob input matched no readable files.
    #[error("no input files found at '{path}'")]
    NoInputFiles { path: String },

    /// The input files do not share the same shape (header count, row width, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the inferred [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

impl ProcessingError {
    /// Returns true when an I/O error sits anywhere in this error's source chain.
    pub fn is_io(&self) -> bool {
        match self {
            ProcessingError::Io(_) => true,
            ProcessingError::Csv(err) => matches!(err.kind(), ::csv::ErrorKind::Io(_)),
            other => error_chain_contains_io(other),
        }
    }
}

fn error_chain_contains_io(e: &(dyn std::error::Error + 'static)) -> bool {
    let mut cur: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Pipeline stage in which a job failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Read,
    Write,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStage::Read => f.write_str("read"),
            JobStage::Write => f.write_str("write"),
        }
    }
}

/// A failed job run: the stage it failed in, with the original cause attached.
#[derive(Debug, Error)]
#[error("processing failed during {stage}: {source}")]
pub struct JobFailure {
    pub stage: JobStage,
    #[source]
    pub source: ProcessingError,
}

impl JobFailure {
    pub fn new(stage: JobStage, source: ProcessingError) -> Self {
        Self { stage, source }
    }
}
