//! Logging setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging with the specified level; `RUST_LOG` takes precedence.
///
/// Calling it more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .with(filter)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_twice() {
        setup_logging("debug");
        setup_logging("info");
        tracing::debug!("logging initialised");
    }
}
