use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing subscriber for the command-line client.
/// - Respects `RUST_LOG` if set
/// - Falls back to `warn,service=info` so command output stays readable
/// - Writes to stderr; stdout is reserved for command results
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,service=info,zurince=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `info`
/// - Emits one JSON object per event, request spans included
pub fn init_logging_json() {
    // RUST_LOG=debug,service::api=trace shows every gateway request
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,service::api=debug"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .json()
        .with_writer(io::stderr)
        .try_init();
}
