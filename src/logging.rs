use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ROSTER_LOG";

/// `ROSTER_LOG` wins over the configured filter; an unparsable filter falls
/// back to `warn`.
pub fn env_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Safe to call more than once; later calls are ignored.
pub fn init(configured: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(configured))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
