//! Structured logging setup.
//!
//! The library itself only emits `tracing` events; binaries and tests that
//! want to see them call [`init_logging`] once.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "symgraph=info";

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Defaults to [`DEFAULT_FILTER`]. Later calls are ignored.
pub fn init_logging() {
    init_logging_with(None);
}

/// Like [`init_logging`], but `directive` (e.g. `"symgraph=debug"`) wins over
/// `RUST_LOG` when given.
pub fn init_logging_with(directive: Option<&str>) {
    let filter = match directive {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_does_not_panic() {
        init_logging();
        init_logging();
    }

    #[test]
    fn explicit_directive_after_init_is_ignored() {
        init_logging();
        init_logging_with(Some("symgraph=trace"));
        tracing::debug!("still fine");
    }
}
