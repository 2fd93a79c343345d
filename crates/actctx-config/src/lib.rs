use std::env;
use std::ffi::OsString;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::manifest::ManifestConfig;

pub mod logging;
pub mod manifest;

pub use self::logging::LogFormat;
pub use self::manifest::ConfigError;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub manifest: ManifestConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Read configuration from `ACTCTX_*` environment variables
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var_os(name))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, ConfigError> {
        Ok(Config {
            manifest: ManifestConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_all_sections() {
        let config = Config::from_lookup(|name| match name {
            "ACTCTX_MANIFEST" => Some(OsString::from("webkit.manifest")),
            "ACTCTX_LOG_FORMAT" => Some(OsString::from("json")),
            _ => None,
        })
        .unwrap();

        assert_eq!(
            config.manifest.path.as_deref(),
            Some(std::path::Path::new("webkit.manifest"))
        );
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
