use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output shape of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One short line per event, for a terminal.
    Compact,
    /// One JSON object per event, for hosts that ship plugin logs to a collector.
    Json,
}

/// Filter used when `RUST_LOG` is not set: `level` for this crate, and
/// `info` for dependencies when debugging so their noise stays out.
fn default_directives(level: &str) -> String {
    if level.eq_ignore_ascii_case("debug") || level.eq_ignore_ascii_case("trace") {
        format!("mcshop={},info", level)
    } else {
        format!("mcshop={}", level)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_logger(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let (compact, json) = match format {
        LogFormat::Compact => (Some(base_layer().compact()), None),
        LogFormat::Json => (None, Some(base_layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .init();
}

fn base_layer<S>() -> fmt::Layer<S> {
    fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(if verbose { "debug" } else { "info" }, LogFormat::Compact);
}

pub fn init_json_logger(level: &str) {
    init_logger(level, LogFormat::Json);
}
