//! Initialisation des traces.

use tracing_subscriber::EnvFilter;

/// Initialise `tracing` pour le processus, filtre via `RUST_LOG` (défaut `info`).
///
/// Les appels suivants sont sans effet.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = installed {
        tracing::debug!(error = %e, "abonné tracing déjà installé");
    }
}
