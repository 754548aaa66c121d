use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::CliError;

/// Send JSON events to `path`, appending. The terminal belongs to the TUI, so
/// nothing is written to stdout or stderr. `RUST_LOG` narrows the filter;
/// the default level is `info`.
pub fn init_logging(path: &Path) -> Result<(), CliError> {
    let file = open_log(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer(file))
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))?;

    Ok(())
}

fn open_log(path: &Path) -> Result<File, CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// One JSON object per line, RFC 3339 UTC timestamps.
fn json_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(Mutex::new(file))
}
