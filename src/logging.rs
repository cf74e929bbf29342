use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `info`, or `debug`
/// with `verbose`. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "warn,menu_planner_rs=debug"
    } else {
        "warn,menu_planner_rs=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
