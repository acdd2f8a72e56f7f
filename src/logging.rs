use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default verbosity when `RUST_LOG` is not set.
const DEFAULT_DIRECTIVE: &str = "discount_dashboard=info";

/// Installs the global console subscriber.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();
}
