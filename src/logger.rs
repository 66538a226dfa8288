use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive for the given verbosity flags.
pub fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "img_batch=debug"
    } else {
        "warn"
    }
}

/// Installs the global tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the quiet/verbose flags. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init(quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
