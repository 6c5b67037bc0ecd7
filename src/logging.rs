//! Tracing setup for binaries and host apps

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that overrides the configured level
pub const LOG_ENV_VAR: &str = "TRACKER_LOG";

/// Install a fmt subscriber filtered by `TRACKER_LOG`, falling back to
/// `default_level`
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init("debug");
        assert!(!init("info"));
    }
}
