use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::LogArgs;

/// Logs go to stderr so stdout carries only the extraction JSON.
/// `RUST_LOG` takes precedence over `--log-level`.
pub fn init_logging(args: &LogArgs) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if args.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
