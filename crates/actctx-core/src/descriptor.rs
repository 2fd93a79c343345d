use std::path::{Path, PathBuf};

use crate::error::ActivationError;

/// What the OS needs to build an activation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDescriptor {
    source: PathBuf,
    assembly_directory: Option<PathBuf>,
    resource_id: Option<u16>,
}

impl ContextDescriptor {
    /// Descriptor for a standalone manifest file
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            assembly_directory: None,
            resource_id: None,
        }
    }

    /// Directory probed for assemblies the manifest depends on
    pub fn with_assembly_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assembly_directory = Some(dir.into());
        self
    }

    /// Read the manifest from resource `id` of the PE image at `source`
    pub fn with_resource_id(mut self, id: u16) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn assembly_directory(&self) -> Option<&Path> {
        self.assembly_directory.as_deref()
    }

    pub fn resource_id(&self) -> Option<u16> {
        self.resource_id
    }

    pub fn validate(&self) -> Result<(), ActivationError> {
        if self.source.as_os_str().is_empty() {
            return Err(ActivationError::InvalidDescriptor(
                "manifest source path is empty".to_string(),
            ));
        }
        if self.resource_id == Some(0) {
            return Err(ActivationError::InvalidDescriptor(
                "resource id must be non-zero".to_string(),
            ));
        }
        if self
            .assembly_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(ActivationError::InvalidDescriptor(
                "assembly directory is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<PathBuf> for ContextDescriptor {
    fn from(source: PathBuf) -> Self {
        Self::new(source)
    }
}

impl From<&Path> for ContextDescriptor {
    fn from(source: &Path) -> Self {
        Self::new(source)
    }
}

impl From<String> for ContextDescriptor {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<&str> for ContextDescriptor {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}
