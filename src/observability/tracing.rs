use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize structured logging.
///
/// Honors `RUST_LOG` when set; otherwise defaults to info for the service and
/// the HTTP layer. `enable_json_logging` switches the formatter from the
/// human-readable development layout to one JSON object per line.
pub fn init_observability(
    service_name: &str,
    enable_json_logging: bool,
) -> Result<(), ObservabilityError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}=info,tower_http=info",
            service_name.replace('-', "_")
        )
        .into()
    });

    let result = if enable_json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()
    };

    result.map_err(|err| ObservabilityError::TracingInit(err.to_string()))?;

    info!(service = service_name, "Observability initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_init_is_an_error_not_a_panic() {
        // whichever call wins the race, the second must fail cleanly
        let first = init_observability("barberbook-test", false);
        let second = init_observability("barberbook-test", true);
        assert!(first.is_ok() || second.is_err());
    }
}
