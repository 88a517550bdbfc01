use std::io;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Install the tracing subscriber. Logs go to stderr; stdout belongs to
/// the console. `RUST_LOG` wins over `default_filter` when set.
pub fn init(default_filter: &str) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .try_init();
    });
}
