use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use actctx_core::ContextDescriptor;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No manifest configured (set ACTCTX_MANIFEST or pass --manifest)")]
    MissingManifest,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Where the activation context comes from
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Manifest file, or PE image when `resource_id` is set
    pub path: Option<PathBuf>,
    pub assembly_directory: Option<PathBuf>,
    pub resource_id: Option<u16>,
}

impl ManifestConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var_os(name))
    }

    /// Build from `ACTCTX_MANIFEST`, `ACTCTX_ASSEMBLY_DIR` and `ACTCTX_RESOURCE_ID`
    /// as returned by `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, ConfigError> {
        let path = lookup("ACTCTX_MANIFEST").map(PathBuf::from);
        let assembly_directory = lookup("ACTCTX_ASSEMBLY_DIR").map(PathBuf::from);
        let resource_id = lookup("ACTCTX_RESOURCE_ID")
            .map(|v| Self::parse_resource_id(&v.to_string_lossy()))
            .transpose()?;

        Ok(Self {
            path,
            assembly_directory,
            resource_id,
        })
    }

    /// Parse a resource id given on the command line or in the environment
    pub fn parse_resource_id(value: &str) -> Result<u16, ConfigError> {
        match value.trim().parse::<u16>() {
            Ok(id) if id != 0 => Ok(id),
            _ => Err(ConfigError::InvalidValue {
                name: "resource id",
                value: value.to_string(),
            }),
        }
    }

    pub fn descriptor(&self) -> Result<ContextDescriptor, ConfigError> {
        let path = self.path.clone().ok_or(ConfigError::MissingManifest)?;

        let mut descriptor = ContextDescriptor::new(path);
        if let Some(dir) = &self.assembly_directory {
            descriptor = descriptor.with_assembly_directory(dir.clone());
        }
        if let Some(id) = self.resource_id {
            descriptor = descriptor.with_resource_id(id);
        }
        Ok(descriptor)
    }
}
