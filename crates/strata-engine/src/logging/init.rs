use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "strata_engine=debug,wgpu_core=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Route output through the test harness capture instead of stderr.
    pub is_test: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            is_test: false,
        }
    }
}

impl LoggingConfig {
    /// Config used by unit tests: debug output for this crate, quiet wgpu.
    pub fn for_tests() -> Self {
        Self {
            env_filter: Some("strata_engine=debug,wgpu_core=warn,wgpu_hal=warn".to_string()),
            write_style: env_logger::WriteStyle::Never,
            is_test: true,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);
        builder.is_test(config.is_test);

        // try_init: another crate in the same process may have installed a logger.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_ignored() {
        init_logging(LoggingConfig::for_tests());
        init_logging(LoggingConfig::default());
        assert!(INIT.is_completed());
        assert!(log::max_level() >= log::LevelFilter::Error);
    }
}
