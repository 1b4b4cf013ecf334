//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout stays free for JSON results.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "info";

/// Filter used when `RUST_LOG` is unset: `level` for this crate, warn elsewhere.
pub fn default_directive(level: &str) -> String {
    let level = match level.trim() {
        "" => DEFAULT_LEVEL,
        l => l,
    };
    format!("warn,stocker={}", level.to_lowercase())
}

/// Install the global subscriber. `RUST_LOG` wins over `level`.
///
/// A second call is a no-op.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directive(DEFAULT_LEVEL)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_uses_level() {
        assert_eq!(default_directive("debug"), "warn,stocker=debug");
        assert_eq!(default_directive("WARN"), "warn,stocker=warn");
    }

    #[test]
    fn directive_defaults_to_info() {
        assert_eq!(default_directive("  "), "warn,stocker=info");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init("debug");
        init("info");
    }
}
