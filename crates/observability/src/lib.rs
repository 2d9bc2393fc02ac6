//! Tracing/logging setup shared by the binaries.

/// Initialize process-wide tracing with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_json();
}

/// Initialize process-wide tracing with human-readable output.
pub fn init_pretty() {
    tracing::init_pretty();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
