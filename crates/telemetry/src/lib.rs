//! Tracing subscriber bootstrap shared by every SHELF binary.

use anyhow::anyhow;
use shelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Events go to stderr so stdout stays free for command output.
/// `RUST_LOG` takes precedence over `telemetry.filter`. Fails if a global
/// subscriber is already installed or the fallback filter does not parse.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_filter(settings)?;

    let installed = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    };

    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(
        target: "shelf-telemetry",
        format = ?settings.log_format,
        "tracing subscriber installed"
    );
    Ok(())
}

fn build_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter)
            .map_err(|err| anyhow!("invalid telemetry filter '{}': {err}", settings.filter)),
    }
}
