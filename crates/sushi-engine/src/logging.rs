//! # Logging Bootstrap
//!
//! Installs the global `tracing` subscriber.
//!
//! ```text
//! RUST_LOG set?  ──yes──► EnvFilter from RUST_LOG
//!      │
//!      no
//!      ▼
//! EnvFilter::new(default_filter)   e.g. "info,sushi=debug,sqlx=warn"
//! ```

use tracing_subscriber::EnvFilter;

/// Initializes tracing for logging.
///
/// Safe to call more than once: only the first call installs a subscriber.
///
/// ## Returns
/// `true` if this call installed the subscriber.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing("debug");
        assert!(!init_tracing("debug"));
    }
}
