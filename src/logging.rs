use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PACKAGE_LIST_LOG";

/// Installs the stderr subscriber. Filter comes from `PACKAGE_LIST_LOG`,
/// defaulting to `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
