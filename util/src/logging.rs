//! Defines helpers for logging

pub use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::Format};

/// Build an env filter that defaults to the given level
///
/// `RUST_LOG` directives, when set, take precedence over the default
fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

/// Initialize a logger at the given log level
pub fn setup_system_logger(level: LevelFilter) {
    tracing_subscriber::fmt()
        .event_format(Format::default().pretty())
        .with_env_filter(env_filter(level))
        .init();
}

/// Initialize a logger that emits newline delimited JSON records
pub fn setup_json_logger(level: LevelFilter) {
    tracing_subscriber::fmt().json().with_env_filter(env_filter(level)).init();
}

/// Parse a log level from its string name, e.g. `"debug"`
pub fn parse_log_level(level: &str) -> Result<LevelFilter, String> {
    level.parse::<LevelFilter>().map_err(|e| format!("invalid log level `{level}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), LevelFilter::WARN);
        assert!(parse_log_level("chatty").is_err());
    }
}
