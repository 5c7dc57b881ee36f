//! Logging Infrastructure

use tracing_subscriber::EnvFilter;

/// Initialize the logger.
///
/// `RUST_LOG` wins when set; otherwise `level` (default `info`) applies.
/// Returns `false` if a global subscriber was already installed.
pub fn init_logger(level: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_does_not_panic() {
        init_logger(Some("debug"));
        assert!(!init_logger(Some("warn")));
    }
}
