//! Job event reporting.
//!
//! A [`JobSession`](crate::job::JobSession) reports every step of a run to a [`JobObserver`]. The
//! default observer is [`TracingObserver`], which turns events into `tracing` records; install a
//! subscriber (the binary uses `tracing-subscriber`) to see them.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::error::JobFailure;
use crate::output::WrittenOutput;

/// Severity classification for failure callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureSeverity {
    /// The run failed (bad input shape, unparsable value, ...).
    Error,
    /// Infrastructure failure: an I/O error sits in the cause chain.
    Critical,
}

impl FailureSeverity {
    pub fn for_failure(failure: &JobFailure) -> Self {
        if failure.source.is_io() {
            Self::Critical
        } else {
            Self::Error
        }
    }
}

/// Context about a job run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobContext {
    pub job_name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Output format as requested (before any fallback).
    pub file_format: String,
}

/// Shape of the dataset after the read step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    pub rows: usize,
    pub columns: usize,
}

/// Observer interface for job events.
///
/// Every method has a no-op default so implementors only override what they record.
pub trait JobObserver: Send + Sync {
    /// The run is starting.
    fn on_started(&self, _ctx: &JobContext) {}

    /// The input was read.
    fn on_read(&self, _ctx: &JobContext, _stats: ReadStats) {}

    /// Column names were normalized.
    fn on_normalized(&self, _ctx: &JobContext, _columns: &[String]) {}

    /// The requested output format is not recognized; CSV is written instead.
    fn on_unsupported_format(&self, _ctx: &JobContext, _requested: &str) {}

    /// The output was written.
    fn on_written(&self, _ctx: &JobContext, _output: &WrittenOutput) {}

    /// The run failed. The failure is returned to the caller after this call.
    fn on_failure(&self, _ctx: &JobContext, _severity: FailureSeverity, _failure: &JobFailure) {}

    /// The session was committed.
    fn on_committed(&self, _ctx: &JobContext, _elapsed: Duration) {}
}

/// Emits job events as `tracing` records.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl JobObserver for TracingObserver {
    fn on_started(&self, ctx: &JobContext) {
        info!(
            job = %ctx.job_name,
            "starting processing: {} -> {}",
            ctx.input_path.display(),
            ctx.output_path.display()
        );
    }

    fn on_read(&self, ctx: &JobContext, stats: ReadStats) {
        info!(
            job = %ctx.job_name,
            rows = stats.rows,
            columns = stats.columns,
            "input read"
        );
    }

    fn on_normalized(&self, ctx: &JobContext, columns: &[String]) {
        info!(job = %ctx.job_name, columns = ?columns, "columns normalized");
    }

    fn on_unsupported_format(&self, ctx: &JobContext, requested: &str) {
        warn!(
            job = %ctx.job_name,
            "unsupported output format: {requested}. writing as csv"
        );
    }

    fn on_written(&self, ctx: &JobContext, output: &WrittenOutput) {
        info!(
            job = %ctx.job_name,
            writer = %output.writer,
            rows = output.rows,
            "data written to {}",
            output.path.display()
        );
    }

    fn on_failure(&self, ctx: &JobContext, severity: FailureSeverity, failure: &JobFailure) {
        error!(
            job = %ctx.job_name,
            severity = ?severity,
            stage = %failure.stage,
            "error during processing: {failure}"
        );
    }

    fn on_committed(&self, ctx: &JobContext, elapsed: Duration) {
        info!(job = %ctx.job_name, elapsed = ?elapsed, "job {} completed", ctx.job_name);
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn JobObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn JobObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl JobObserver for CompositeObserver {
    fn on_started(&self, ctx: &JobContext) {
        for o in &self.observers {
            o.on_started(ctx);
        }
    }

    fn on_read(&self, ctx: &JobContext, stats: ReadStats) {
        for o in &self.observers {
            o.on_read(ctx, stats);
        }
    }

    fn on_normalized(&self, ctx: &JobContext, columns: &[String]) {
        for o in &self.observers {
            o.on_normalized(ctx, columns);
        }
    }

    fn on_unsupported_format(&self, ctx: &JobContext, requested: &str) {
        for o in &self.observers {
            o.on_unsupported_format(ctx, requested);
        }
    }

    fn on_written(&self, ctx: &JobContext, output: &WrittenOutput) {
        for o in &self.observers {
            o.on_written(ctx, output);
        }
    }

    fn on_failure(&self, ctx: &JobContext, severity: FailureSeverity, failure: &JobFailure) {
        for o in &self.observers {
            o.on_failure(ctx, severity, failure);
        }
    }

    fn on_committed(&self, ctx: &JobContext, elapsed: Duration) {
        for o in &self.observers {
            o.on_committed(ctx, elapsed);
        }
    }
}

/// Appends job events to a local file, one JSON object per line.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are only reported via `tracing`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: &str, ctx: &JobContext, details: serde_json::Value) {
        let line = json!({
            "ts": unix_ts(),
            "event": event,
            "job": ctx.job_name,
            "details": details,
        });
        let _guard = self.lock.lock().ok();
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{line}"));
        if let Err(e) = written {
            debug!(path = %self.path.display(), "event log append failed: {e}");
        }
    }
}

impl JobObserver for FileObserver {
    fn on_started(&self, ctx: &JobContext) {
        self.append("started", ctx, json!(ctx));
    }

    fn on_read(&self, ctx: &JobContext, stats: ReadStats) {
        self.append("read", ctx, json!(stats));
    }

    fn on_normalized(&self, ctx: &JobContext, columns: &[String]) {
        self.append("normalized", ctx, json!({ "columns": columns }));
    }

    fn on_unsupported_format(&self, ctx: &JobContext, requested: &str) {
        self.append("unsupported_format", ctx, json!({ "requested": requested }));
    }

    fn on_written(&self, ctx: &JobContext, output: &WrittenOutput) {
        self.append("written", ctx, json!(output));
    }

    fn on_failure(&self, ctx: &JobContext, severity: FailureSeverity, failure: &JobFailure) {
        self.append(
            "failed",
            ctx,
            json!({
                "severity": severity,
                "stage": failure.stage,
                "error": failure.to_string(),
            }),
        );
    }

    fn on_committed(&self, ctx: &JobContext, elapsed: Duration) {
        self.append("committed", ctx, json!({ "elapsed_ms": elapsed.as_millis() as u64 }));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::{JobStage, ProcessingError};

    fn ctx() -> JobContext {
        JobContext {
            job_name: "nightly".to_string(),
            input_path: PathBuf::from("in.csv"),
            output_path: PathBuf::from("out.csv"),
            file_format: "xml".to_string(),
        }
    }

    #[test]
    fn file_observer_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("events.jsonl");
        let obs = FileObserver::new(&log);

        obs.on_started(&ctx());
        obs.on_unsupported_format(&ctx(), "xml");
        let failure = JobFailure::new(
            JobStage::Read,
            ProcessingError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "in.csv")),
        );
        obs.on_failure(&ctx(), FailureSeverity::for_failure(&failure), &failure);

        let text = fs::read_to_string(&log).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "started");
        assert_eq!(lines[0]["details"]["input_path"], "in.csv");
        assert_eq!(lines[1]["details"]["requested"], "xml");
        assert_eq!(lines[2]["details"]["severity"], "critical");
        assert_eq!(lines[2]["details"]["stage"], "read");
    }

    #[test]
    fn severity_is_critical_only_for_io_rooted_failures() {
        let io = JobFailure::new(
            JobStage::Write,
            ProcessingError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "ro")),
        );
        let shape = JobFailure::new(
            JobStage::Read,
            ProcessingError::SchemaMismatch {
                message: "ragged".to_string(),
            },
        );
        assert_eq!(FailureSeverity::for_failure(&io), FailureSeverity::Critical);
        assert_eq!(FailureSeverity::for_failure(&shape), FailureSeverity::Error);
    }
}
