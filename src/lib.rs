pub mod analyzer;
pub mod twitter;

/// Number of table rows printed by the batch binary.
pub const HEAD_ROWS: usize = 40;

/// Install the stderr log subscriber, honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
