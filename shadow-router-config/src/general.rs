use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Settings that apply to the router process as a whole.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct General {
    /// Log level used when `RUST_LOG` isn't set.
    ///
    /// _Default:_ `info`
    #[serde(default = "General::log_level")]
    pub log_level: String,

    /// Log output format.
    ///
    /// _Default:_ `text`
    #[serde(default = "General::log_format")]
    pub log_format: LogFormat,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: Self::log_level(),
            log_format: Self::log_format(),
        }
    }
}

impl General {
    fn env_string_or_default(env_var: &str, default: &str) -> String {
        env::var(env_var).unwrap_or_else(|_| default.to_string())
    }

    fn env_enum_or_default<T: FromStr + Default>(env_var: &str) -> T {
        env::var(env_var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    fn log_level() -> String {
        Self::env_string_or_default("SHADOW_ROUTER_LOG_LEVEL", "info")
    }

    fn log_format() -> LogFormat {
        Self::env_enum_or_default("SHADOW_ROUTER_LOG_FORMAT")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
