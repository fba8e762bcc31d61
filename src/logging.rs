use std::env;

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install the global subscriber. Diagnostics go to stderr so menu output on
/// stdout stays clean.
///
/// `RUST_LOG` takes precedence over `verbose`. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let env_filter = env::var("RUST_LOG").map_or_else(
        |_| EnvFilter::new(default_directive(verbose)),
        |directive| EnvFilter::new(&directive),
    );

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }
}
