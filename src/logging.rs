//! Logger setup for the binaries.
use env_logger::{Builder, Env};
use log::{debug, LevelFilter};

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages are printed; otherwise only info
/// and above. `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Tests may call `init` repeatedly; only the first call installs a logger.
    if builder.try_init().is_err() {
        debug!("logger already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(false, LevelFilter::Info)]
    #[case::verbose(true, LevelFilter::Debug)]
    fn verbosity_selects_level(#[case] verbose: bool, #[case] expected: LevelFilter) {
        assert_eq!(default_level(verbose), expected);
    }

    #[test]
    fn repeated_init_does_not_panic() {
        init(false);
        init(true);
    }
}
