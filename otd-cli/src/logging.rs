use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize logging to stderr.
///
/// `OTD_LOG` wins over the flags. A bare level (`debug`) applies to both crates, a full
/// directive (`otd_core=trace`) is used as is.
pub fn init_tracing(verbose: bool, log_level: Option<&str>) -> Result<()> {
    let level = match (verbose, log_level) {
        (_, Some(level)) => level,
        (true, None) => "debug",
        (false, None) => "warn",
    };

    let filter = EnvFilter::try_from_env("OTD_LOG").unwrap_or_else(|_| {
        if level.contains('=') {
            EnvFilter::new(level)
        } else {
            EnvFilter::new(format!("otd={level},otd_core={level}"))
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}
