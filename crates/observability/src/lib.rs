//! Logging setup shared by StockHub binaries.

/// Initialize process-wide logging from the environment.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    let _ = tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
