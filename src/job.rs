//! Job session and the read → normalize → write pipeline.
//!
//! A [`JobSession`] is created explicitly at the start of a run, passed to [`run_job`] (and from
//! there to the writer), and disposed explicitly with [`JobSession::commit`]:
//!
//! ```no_run
//! use column_normalizer::config::JobArgs;
//! use column_normalizer::job::{run_job, JobSession};
//!
//! # fn main() -> Result<(), column_normalizer::JobFailure> {
//! let args = JobArgs::new("raw/users.csv", "clean/users.parquet").with_file_format("parquet");
//! let session = JobSession::init(args);
//! let written = run_job(&session)?;
//! println!("rows={}", written.rows);
//! session.commit();
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::JobArgs;
use crate::error::{JobFailure, JobResult, JobStage};
use crate::format::OutputFormat;
use crate::ingestion::{read_input, ReadOptions};
use crate::normalize::{duplicate_column_names, normalize_columns};
use crate::observability::{FailureSeverity, JobContext, JobObserver, ReadStats, TracingObserver};
use crate::output::{write_dataset, WriteOptions, WrittenOutput};

/// State for one job run.
pub struct JobSession {
    args: JobArgs,
    context: JobContext,
    read_options: ReadOptions,
    write_options: WriteOptions,
    observer: Arc<dyn JobObserver>,
    started_at: Instant,
    committed: bool,
}

impl JobSession {
    /// Open a session for `args`, reporting to a [`TracingObserver`].
    pub fn init(args: JobArgs) -> Self {
        let context = JobContext {
            job_name: args.job_name.clone(),
            input_path: args.input_path.clone(),
            output_path: args.output_path.clone(),
            file_format: args.output_format().to_string(),
        };
        Self {
            read_options: args.read_options(),
            write_options: args.write_options(),
            args,
            context,
            observer: Arc::new(TracingObserver),
            started_at: Instant::now(),
            committed: false,
        }
    }

    /// Replace the observer that receives job events.
    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Override how the input is read (e.g. to supply an explicit schema).
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }

    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = options;
        self
    }

    pub fn args(&self) -> &JobArgs {
        &self.args
    }

    pub fn context(&self) -> &JobContext {
        &self.context
    }

    pub fn observer(&self) -> &dyn JobObserver {
        self.observer.as_ref()
    }

    pub fn read_options(&self) -> &ReadOptions {
        &self.read_options
    }

    pub fn write_options(&self) -> &WriteOptions {
        &self.write_options
    }

    /// Close the session and report completion. Returns the session's lifetime.
    pub fn commit(mut self) -> Duration {
        self.committed = true;
        let elapsed = self.started_at.elapsed();
        self.observer.on_committed(&self.context, elapsed);
        elapsed
    }
}

impl fmt::Debug for JobSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobSession")
            .field("context", &self.context)
            .field("read_options", &self.read_options)
            .field("write_options", &self.write_options)
            .field("committed", &self.committed)
            .finish()
    }
}

impl Drop for JobSession {
    fn drop(&mut self) {
        if !self.committed {
            warn!(job = %self.context.job_name, "job session closed without commit");
        }
    }
}

/// Run the job described by `session`: read, normalize column names, write.
///
/// On failure the observer receives `on_failure` with the failure message, and the same failure
/// is returned. Nothing is retried; a failed read leaves the destination untouched.
pub fn run_job(session: &JobSession) -> JobResult<WrittenOutput> {
    let ctx = session.context();
    let observer = session.observer();
    observer.on_started(ctx);

    let result = run_stages(session);
    if let Err(failure) = &result {
        observer.on_failure(ctx, FailureSeverity::for_failure(failure), failure);
    }
    result
}

fn run_stages(session: &JobSession) -> JobResult<WrittenOutput> {
    let ctx = session.context();
    let observer = session.observer();
    let args = session.args();

    let dataset = read_input(&args.input_path, session.read_options())
        .map_err(|e| JobFailure::new(JobStage::Read, e))?;
    observer.on_read(
        ctx,
        ReadStats {
            rows: dataset.row_count(),
            columns: dataset.column_count(),
        },
    );

    let dataset = normalize_columns(dataset);
    let columns = dataset.column_names();
    let duplicates = duplicate_column_names(&columns);
    if !duplicates.is_empty() {
        debug!(job = %ctx.job_name, duplicates = ?duplicates, "normalized column names collide");
    }
    observer.on_normalized(ctx, &columns);

    let format: OutputFormat = args.output_format();
    let written = write_dataset(session, &dataset, &args.output_path, &format)
        .map_err(|e| JobFailure::new(JobStage::Write, e))?;
    observer.on_written(ctx, &written);
    Ok(written)
}
