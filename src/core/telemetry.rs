use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Settings;

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level; `EXAMSPARK_LOG_JSON` switches to JSON lines.
pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.telemetry().log_level.clone()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(fmt::format::FmtSpan::CLOSE);

    let installed =
        if settings.telemetry().json { builder.json().try_init() } else { builder.try_init() };

    installed.map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}
