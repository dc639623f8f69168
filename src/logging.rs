use tracing_subscriber::EnvFilter;

/// Initialise logging for a host embedding the crate. The default level is
/// `info`; passing `debug = true` raises it to `debug` and additionally lets
/// the `RUST_LOG` environment variable override the filter.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        // Ignore RUST_LOG here so a stray environment variable cannot turn
        // on verbose output for every user.
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
