pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global `fmt` subscriber on stderr. Without `RUST_LOG` the
/// filter is `spend_to_save=info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("spend_to_save=info"));

        // Another subscriber may already be installed by an embedding application.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
