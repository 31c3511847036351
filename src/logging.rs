//! Log output setup for the binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// Plain lines on stderr, no timestamps or targets. `RUST_LOG` wins over the
/// `verbose` flag when set.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(verbose);

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info};

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(false), "warn,treesync=info");
        assert_eq!(default_directive(true), "warn,treesync=debug");
    }

    #[test]
    fn test_logging_init() {
        // Only one global subscriber per process; a second init may fail.
        let _ = init(true);

        info!("This is an info message");
        debug!("This is a debug message");
    }
}
