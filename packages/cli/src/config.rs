//! CLI configuration, populated from environment variables.

/// Defaults for the `hal` command, read from the environment.
///
/// Command-line flags take precedence over every value here.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `HAL_LOG` | `RUST_LOG`, else `warn` | `tracing` filter for diagnostics on stderr |
/// | `HAL_COMPACT` | `false` | Print JSON on one line instead of pretty-printed |
/// | `HAL_STRICT` | `false` | `normalize` refuses documents that fail validation |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,

    pub compact: bool,

    pub strict: bool,
}

impl CliConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = lookup("HAL_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "warn".into());

        Self {
            log_filter,
            compact: lookup("HAL_COMPACT").is_some_and(|v| truthy(&v)),
            strict: lookup("HAL_STRICT").is_some_and(|v| truthy(&v)),
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        assert_eq!(
            config(&[]),
            CliConfig {
                log_filter: "warn".into(),
                compact: false,
                strict: false,
            }
        );
    }

    #[test]
    fn hal_log_wins_over_rust_log() {
        assert_eq!(config(&[("RUST_LOG", "info")]).log_filter, "info");
        assert_eq!(
            config(&[("RUST_LOG", "info"), ("HAL_LOG", "societatis_hal=trace")]).log_filter,
            "societatis_hal=trace"
        );
    }

    #[test]
    fn boolean_switches() {
        assert!(config(&[("HAL_COMPACT", "1")]).compact);
        assert!(config(&[("HAL_STRICT", "TRUE")]).strict);
        assert!(!config(&[("HAL_STRICT", "0")]).strict);
        assert!(!config(&[("HAL_COMPACT", "nope")]).compact);
    }
}
