/// Environment variable consulted by [`Config::from_env`].
pub const LOG_ENV: &str = "TESSEL_LOG";

/// Filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "info,tessel_ui=debug";

/// Configuration for a Tessel host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Build a configuration, taking the log filter from `TESSEL_LOG` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(filter) = std::env::var(LOG_ENV)
            && !filter.trim().is_empty()
        {
            config.log_filter = filter;
        }
        config
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line output
    #[default]
    Compact,
    /// Multi-line output with span context, useful when tracing attach cycles
    Pretty,
}
