//! Command-line entry point.
//!
//! Logging is controlled with `RUST_LOG` (tracing-subscriber `EnvFilter`, default `info`).

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use column_normalizer::config::JobArgs;
use column_normalizer::job::{run_job, JobSession};
use column_normalizer::observability::{CompositeObserver, FileObserver, JobObserver, TracingObserver};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).with_target(false).init();

    let args = JobArgs::parse();

    let mut observers: Vec<Arc<dyn JobObserver>> = vec![Arc::new(TracingObserver)];
    if let Some(path) = &args.event_log {
        observers.push(Arc::new(FileObserver::new(path)));
    }

    let session = JobSession::init(args).with_observer(Arc::new(CompositeObserver::new(observers)));
    run_job(&session)?;
    session.commit();
    Ok(())
}
