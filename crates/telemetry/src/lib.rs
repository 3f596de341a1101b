//! Tracing subscriber bootstrap.

use folio_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Fails if a global
/// subscriber is already installed or the filter does not parse.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_filter(settings)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match settings.log_format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    }
    .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(
        target: "folio-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}

fn build_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&settings.filter),
    }
    .map_err(|err| anyhow::anyhow!("invalid log filter: {err}"))
}
