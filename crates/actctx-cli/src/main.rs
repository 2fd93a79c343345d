use std::process::ExitCode;

use actctx_config::Config;
use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod logging;
mod probe;

use self::cli::{Cli, Command};

fn main() -> Result<ExitCode> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::new().context("Invalid ACTCTX_* environment")?;
    cli.apply(&mut config);

    logging::init(&config.logging);

    run(cli.command, &config)
}

fn run(command: Command, config: &Config) -> Result<ExitCode> {
    match command {
        Command::ShowConfig => {
            println!("{}", render_config(config)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Probe { json } => {
            let descriptor = config.manifest.descriptor()?;
            let backend =
                actctx_core::default_backend().context("Native activation backend unavailable")?;

            let report = probe::probe(actctx_core::ActivationContext::with_descriptor(
                descriptor, backend,
            ));

            if json {
                let out = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize probe report")?;
                println!("{out}");
            } else {
                report.print_text();
            }

            if report.succeeded() {
                Ok(ExitCode::SUCCESS)
            } else {
                tracing::warn!("probe failed");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn render_config(config: &Config) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to serialize config")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use actctx_config::LogFormat;
    use serde_json::Value;

    use super::*;

    #[test]
    fn test_show_config_json() {
        let mut config = Config::default();
        let cli = Cli::parse_from([
            "actctx",
            "show-config",
            "--manifest",
            "WebKit.dll",
            "--resource-id",
            "2",
            "--log-format",
            "json",
        ]);
        cli.apply(&mut config);

        let json: Value = serde_json::from_str(&render_config(&config).unwrap()).unwrap();

        assert_eq!(json["manifest"]["path"], "WebKit.dll");
        assert_eq!(json["manifest"]["resource_id"], 2);
        assert!(json["manifest"]["assembly_directory"].is_null());
        assert_eq!(json["logging"]["format"], "json");
        assert_eq!(json["logging"]["filter"], "info");
    }

    #[test]
    fn test_show_config_round_trips() {
        let mut config = Config::default();
        config.manifest.assembly_directory = Some(PathBuf::from("lib"));
        config.logging.format = LogFormat::Json;

        let parsed: Config = serde_json::from_str(&render_config(&config).unwrap()).unwrap();
        assert_eq!(parsed.manifest.assembly_directory, Some(PathBuf::from("lib")));
        assert_eq!(parsed.logging.format, LogFormat::Json);
    }
}
