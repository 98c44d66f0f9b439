//! Logging initialization and configuration

use anyhow::anyhow;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log format: {}", s))
    }
}

/// Initialize the logging system at `info` unless `RUST_LOG` says otherwise
///
/// # Environment Variables
///
/// * `RUST_LOG` - Controls log level (e.g., `info`, `debug`, `option_chain=debug,info`)
pub fn init_logging(service_name: &str, format: LogFormat) -> anyhow::Result<()> {
    init_logging_with_level(service_name, format, "info")
}

/// Initialize the logging system with `default_level` as the fallback filter.
///
/// `RUST_LOG`, when set, takes precedence. Fails if a global subscriber is
/// already installed.
pub fn init_logging_with_level(service_name: &str, format: LogFormat, default_level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {}", e))?;

    tracing::debug!(
        service = service_name,
        format = ?format,
        "Logging initialized"
    );

    Ok(())
}
