use std::env;
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::manifest::ConfigError;

fn default_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                name: "log format",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var_os(name))
    }

    /// Build from `ACTCTX_LOG_FORMAT` and `ACTCTX_LOG` as returned by `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, ConfigError> {
        let format = lookup("ACTCTX_LOG_FORMAT")
            .map(|v| v.to_string_lossy().parse())
            .transpose()?
            .unwrap_or_default();

        let filter = lookup("ACTCTX_LOG")
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_else(default_filter);

        Ok(Self { format, filter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_reads_environment() {
        let config = LoggingConfig::from_lookup(|name| match name {
            "ACTCTX_LOG_FORMAT" => Some(OsString::from("json")),
            "ACTCTX_LOG" => Some(OsString::from("actctx_core=debug")),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "actctx_core=debug");
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = LoggingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = LoggingConfig::from_lookup(|name| {
            (name == "ACTCTX_LOG_FORMAT").then(|| OsString::from("xml"))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(LoggingConfig::default().filter, "info");
    }
}
