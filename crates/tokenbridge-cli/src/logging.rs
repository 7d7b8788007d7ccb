use crate::error::{CliError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr log subscriber.
///
/// `RUST_LOG` picks the level, defaulting to `warn`; `verbose` forces `debug`.
pub fn init(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))
    }
    .map_err(|e| CliError::Logging(e.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
