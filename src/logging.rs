//! Logging configuration using tracing
//!
//! Structured logging to stderr, filtered through the RUST_LOG environment
//! variable. Migration progress and unmapped-user notices are emitted at
//! `info`/`warn`, so the default filter keeps this crate at `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when RUST_LOG is unset
const DEFAULT_FILTER: &str = "warn,jira2clubhouse=info";

/// Initialize the tracing subscriber
///
/// # Example RUST_LOG values
/// - `RUST_LOG=debug` - Show debug and above for every crate
/// - `RUST_LOG=jira2clubhouse=debug` - Per-item translation details
/// - `RUST_LOG=jira2clubhouse=warn` - Only unmapped users and failed uploads
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| {
            crate::MigrationError::Other(format!("Failed to initialize tracing: {}", e))
        })?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}
