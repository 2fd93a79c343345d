use std::path::PathBuf;

use actctx_config::manifest::ManifestConfig;
use actctx_config::{Config, LogFormat};
use clap::{Parser, Subcommand};

/// Load and exercise Windows activation contexts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Manifest file (or PE image with --resource-id)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Directory probed for dependent assemblies
    #[arg(long, global = true)]
    pub assembly_dir: Option<PathBuf>,

    /// Manifest resource id inside the PE image
    #[arg(long, global = true, value_parser = ManifestConfig::parse_resource_id)]
    pub resource_id: Option<u16>,

    /// Log output format: pretty or json
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, activate and deactivate the context once
    Probe {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration
    ShowConfig,
}

impl Cli {
    /// Command line values win over the environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.manifest {
            config.manifest.path = Some(path.clone());
        }
        if let Some(dir) = &self.assembly_dir {
            config.manifest.assembly_directory = Some(dir.clone());
        }
        if let Some(id) = self.resource_id {
            config.manifest.resource_id = Some(id);
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}
