//! usbtidy CLI entry point

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use usbtidy::cli::Cli;
use usbtidy::config::{report_config_source, Settings};
use usbtidy::pipeline;
use usbtidy_common::config::{ConfigResolver, ConfigSource};
use usbtidy_common::TomlConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config decides the default log level, so load it before logging exists
    let (config, source) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&cli.log_filter(&config.logging.level));

    report_config_source(&source);

    if let Err(e) = cli.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut settings = Settings::from_config(&cli.root, &config);
    cli.apply(&mut settings);
    info!("Target = \"{}\"", settings.root.display());

    match pipeline::run(&settings) {
        Ok(summary) => {
            println!();
            println!(
                "Summary: {} moved, {} already in place, {} failed (of {} files)",
                summary.placement.relocated(),
                summary.placement.already_placed,
                summary.failed(),
                summary.index.files_seen
            );
            for failure in summary
                .index
                .failures
                .iter()
                .chain(&summary.placement.failures)
            {
                println!("  {}", failure.reason);
            }
            for walk_error in &summary.index.walk_errors {
                println!("  Not scanned: {}", walk_error);
            }

            if summary.failed() > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<(TomlConfig, ConfigSource)> {
    ConfigResolver::new(cli.config.clone())
        .load()
        .context("Failed to load configuration")
}

fn init_logging(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .without_time()
        .init();
}
