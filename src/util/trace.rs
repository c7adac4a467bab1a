//! Installs a `tracing_subscriber` registry for hosts that enable the
//! `tracing` feature. Filtering follows `RUST_LOG`, for example:
//! ```bash
//! RUST_LOG=waymark=debug,waymark::marker=trace
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialises the tracer, using tracing subscription.
/// This is optional, not calling this function will simply
/// not log traces. `log` records emitted by the crate are
/// bridged into the same subscriber.
pub fn initialize_tracer() {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();

    // Initialise tracing with subscribers and environment filter
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer);

    if let Err(error) = registry.try_init() {
        log::warn!("Tracer already initialised: {error}");
    }
}
