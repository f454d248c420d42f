//! Setup logging subsystem.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::config;
use crate::error::ConfigurationError;

/// Crates of this workspace, logged at the configured level
const WORKSPACE_CRATES: [&str; 6] = [
    "ucs_common_utils",
    "domain_types",
    "interfaces",
    "connector_integration",
    "external_services",
    "redirect_server",
];

/// Contains guards necessary for logging
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying the logging configuration, service (binary) name, and a
/// list of external crates for which a more verbose logging must be enabled. All crates within the
/// current cargo workspace are automatically considered for verbose logging.
pub fn setup(
    config: &config::Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> Result<TelemetryGuard, ConfigurationError> {
    let mut guards = Vec::new();
    let mut subscriber_layers = Vec::new();

    if config.console.enabled {
        let console_filter_directive =
            config
                .console
                .filtering_directive
                .clone()
                .unwrap_or_else(|| {
                    get_envfilter_directive(
                        tracing::Level::WARN,
                        config.console.level.into_level(),
                        crates_to_filter.as_ref(),
                    )
                });
        let console_level = LevelFilter::from_level(config.console.level.into_level());
        let console_filter = EnvFilter::builder()
            .with_default_directive(console_level.into())
            .parse(&console_filter_directive)
            .map_err(|error| ConfigurationError::LoggerError(error.to_string()))?;

        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);

        let console_layer = match config.console.log_format {
            config::LogFormat::Default => tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_filter(console_filter)
                .boxed(),
            config::LogFormat::Json => {
                // Disable color or emphasis related ANSI escape codes for JSON formats
                error_stack::Report::set_color_mode(error_stack::fmt::ColorMode::None);

                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(writer)
                    .with_filter(console_filter)
                    .boxed()
            }
        };
        subscriber_layers.push(console_layer);
    }

    tracing_subscriber::registry()
        .with(subscriber_layers)
        .try_init()
        .map_err(|error| ConfigurationError::LoggerError(error.to_string()))?;

    tracing::info!(
        service_name,
        build_version = crate::version!(),
        "Logging subsystem initialized"
    );

    // Returning the TelemetryGuard for logs to be printed until it is dropped
    Ok(TelemetryGuard {
        _log_guards: guards,
    })
}

fn get_envfilter_directive(
    default_log_level: tracing::Level,
    filter_log_level: tracing::Level,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> String {
    let mut explicitly_handled_targets = WORKSPACE_CRATES.to_vec();
    explicitly_handled_targets.extend(crates_to_filter.as_ref());

    // +1 for the default log level added as a directive
    let num_directives = explicitly_handled_targets.len() + 1;

    explicitly_handled_targets
        .into_iter()
        .map(|crate_name| crate_name.replace('-', "_"))
        .zip(std::iter::repeat(filter_log_level))
        .fold(
            {
                let mut directives = Vec::with_capacity(num_directives);
                directives.push(default_log_level.to_string());
                directives
            },
            |mut directives, (target, level)| {
                directives.push(format!("{target}={level}"));
                directives
            },
        )
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_crates_get_the_configured_level() {
        let directive = get_envfilter_directive(
            tracing::Level::WARN,
            tracing::Level::DEBUG,
            ["redirect-server", "tower_http"],
        );

        assert!(directive.starts_with("WARN,"));
        assert!(directive.contains("external_services=DEBUG"));
        assert!(directive.contains("tower_http=DEBUG"));
        assert!(directive.contains("redirect_server=DEBUG"));
    }
}
