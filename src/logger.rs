//! Logging setup.
//!
//! Progress goes to stderr through `tracing`; stdout is reserved for the
//! run's diagnostics and the data preview.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "tide_chart_lib=debug,hko_tide_chart=debug,info"
    } else {
        "tide_chart_lib=info,hko_tide_chart=info,warn"
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
