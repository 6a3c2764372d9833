use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use crate::errors::Error;

/// Install the global tracing subscriber: compact console output filtered by
/// RUST_LOG, defaulting to `info` so per-step progress is visible to the operator.
pub fn setup_tracing() -> Result<(), Error> {
    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing::subscriber::set_global_default(Registry::default().with(console_layer))?;
    Ok(())
}
