use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count.
///
/// `RUST_LOG` takes precedence when set.
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "twconfig=info,twconfig_cli=info,warn",
        2 => "twconfig=debug,twconfig_cli=debug,info",
        _ => "trace",
    }
}

/// Install the stderr tracing subscriber.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert!(default_directive(1).contains("twconfig=info"));
        assert!(default_directive(2).contains("twconfig=debug"));
        assert_eq!(default_directive(9), "trace");
    }
}
