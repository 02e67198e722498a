use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global `tracing` subscriber. Filtering is controlled through `RUST_LOG`.
///
/// Calling this more than once is harmless; later calls leave the first subscriber in place.
pub fn init() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber was already set");
    }
}
