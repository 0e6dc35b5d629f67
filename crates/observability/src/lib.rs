//! Tracing/logging setup shared by the console's binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{LogFormat, init_with};

/// Initialize process-wide tracing from `RUST_LOG` (default `info`), JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init();
}
