//! Writing the normalized dataset.
//!
//! [`write_dataset`] is the format dispatcher: it selects a writer from the requested
//! [`OutputFormat`], reports unrecognized formats to the session's observer, and performs exactly
//! one overwrite of the destination.
//!
//! Destinations are replaced, never merged. Data is first written to a temporary file next to the
//! destination and then persisted over it.

pub mod csv;
pub mod parquet;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ::parquet::basic::Compression;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::ProcessingResult;
use crate::format::{OutputFormat, WriterKind};
use crate::job::JobSession;
use crate::types::DataSet;

pub use self::csv::write_csv;
pub use self::parquet::write_parquet;

/// Name of the single part file written in [`OutputLayout::Directory`].
pub const PART_FILE_STEM: &str = "part-00000";

/// Marker file written last in [`OutputLayout::Directory`].
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Shape of the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputLayout {
    /// `output_path` is a single file.
    #[default]
    File,
    /// `output_path` is a directory holding `part-00000.<ext>` and an empty `_SUCCESS` marker.
    Directory,
}

/// Options controlling how output is written.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    pub layout: OutputLayout,
    /// Field delimiter for CSV output.
    pub delimiter: u8,
    /// Parquet page compression.
    pub compression: Compression,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            layout: OutputLayout::File,
            delimiter: b',',
            compression: Compression::SNAPPY,
        }
    }
}

/// Descriptor of a completed write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenOutput {
    /// Destination as requested.
    pub path: PathBuf,
    /// Data files written (one for both layouts).
    pub files: Vec<PathBuf>,
    /// Writer that produced the data.
    pub writer: WriterKind,
    /// Format as requested by the caller.
    pub requested_format: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Write `dataset` to `output_path` in the requested format, replacing prior contents.
///
/// - `csv` → CSV with header row
/// - `parquet` → Parquet
/// - anything else → unsupported-format event on the session's observer, then CSV with header
pub fn write_dataset(
    session: &JobSession,
    dataset: &DataSet,
    output_path: impl AsRef<Path>,
    format: &OutputFormat,
) -> ProcessingResult<WrittenOutput> {
    let output_path = output_path.as_ref();
    if let OutputFormat::Other(requested) = format {
        session
            .observer()
            .on_unsupported_format(session.context(), requested);
    }

    let writer = format.writer();
    let files = write_with_options(dataset, output_path, writer, session.write_options())?;
    Ok(WrittenOutput {
        path: output_path.to_path_buf(),
        files,
        writer,
        requested_format: format.to_string(),
        rows: dataset.row_count(),
        columns: dataset.column_names(),
    })
}

/// Write `dataset` with an explicit writer and options. Returns the data file(s) written.
pub fn write_with_options(
    dataset: &DataSet,
    output_path: impl AsRef<Path>,
    writer: WriterKind,
    options: &WriteOptions,
) -> ProcessingResult<Vec<PathBuf>> {
    let output_path = output_path.as_ref();
    let data_path = match options.layout {
        OutputLayout::File => {
            if output_path.is_dir() {
                fs::remove_dir_all(output_path)?;
            }
            output_path.to_path_buf()
        }
        OutputLayout::Directory => {
            if output_path.is_dir() {
                fs::remove_dir_all(output_path)?;
            } else if output_path.exists() {
                fs::remove_file(output_path)?;
            }
            fs::create_dir_all(output_path)?;
            output_path.join(format!("{PART_FILE_STEM}.{}", writer.extension()))
        }
    };

    persist_atomically(&data_path, |file| {
        let mut buf = BufWriter::new(file);
        match writer {
            WriterKind::Csv => write_csv(dataset, &mut buf, options.delimiter)?,
            WriterKind::Parquet => write_parquet(dataset, &mut buf, options.compression)?,
        }
        buf.flush()?;
        Ok(())
    })?;

    if options.layout == OutputLayout::Directory {
        fs::File::create(output_path.join(SUCCESS_MARKER))?;
    }
    Ok(vec![data_path])
}

/// Run `write` against a temporary file beside `dest`, then move it over `dest`.
fn persist_atomically<F>(dest: &Path, write: F) -> ProcessingResult<()>
where
    F: FnOnce(&mut fs::File) -> ProcessingResult<()>,
{
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    write(tmp.as_file_mut())?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn sample() -> DataSet {
        DataSet::new(
            Schema::new(vec![Field::new("user_name", DataType::Utf8)]),
            vec![vec![Value::Utf8("Ada".to_string())]],
        )
    }

    #[test]
    fn file_layout_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        fs::write(&dest, "stale,contents\n1,2\n3,4\n").unwrap();

        let files =
            write_with_options(&sample(), &dest, WriterKind::Csv, &WriteOptions::default()).unwrap();
        assert_eq!(files, vec![dest.clone()]);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "user_name\nAda\n");
    }

    #[test]
    fn file_layout_replaces_a_directory_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("old-part.csv"), "x\n").unwrap();

        write_with_options(&sample(), &dest, WriterKind::Csv, &WriteOptions::default()).unwrap();
        assert!(dest.is_file());
    }

    #[test]
    fn directory_layout_writes_part_file_and_marker() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("stale.csv"), "x\n").unwrap();

        let opts = WriteOptions {
            layout: OutputLayout::Directory,
            ..Default::default()
        };
        let files = write_with_options(&sample(), &dest, WriterKind::Parquet, &opts).unwrap();

        assert_eq!(files, vec![dest.join("part-00000.parquet")]);
        assert!(dest.join(SUCCESS_MARKER).is_file());
        assert!(!dest.join("stale.csv").exists());
    }

    #[test]
    fn parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a").join("b").join("out.csv");
        write_with_options(&sample(), &dest, WriterKind::Csv, &WriteOptions::default()).unwrap();
        assert!(dest.is_file());
    }
}
