use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "POOLKIT_LOG";
const DEFAULT_FILTER: &str = "info";

/// Installs a fmt subscriber filtered by `POOLKIT_LOG`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn second_install_is_reported_as_already_installed() {
        init_tracing();
        assert!(!init_tracing());
    }
}
