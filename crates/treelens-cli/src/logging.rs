//! Diagnostic logging to stderr.
//!
//! `TREELENS_LOG` takes an `EnvFilter` directive (e.g. `treelens_lib=trace`)
//! and wins over `-v`. Without it, `-v` raises the level from `warn` to
//! `debug`, and `-vv` to `trace`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TREELENS_LOG";

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter(verbosity));

    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn default_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::new(level_for(verbosity))
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "debug");
        assert_eq!(level_for(2), "trace");
        assert_eq!(level_for(9), "trace");
    }
}
