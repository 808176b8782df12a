// Entry point for the infrastructure host process.
//
// Loads settings (file, then environment), installs the tracing subscriber and
// runs one bootstrap session of the built-in steps.

use anyhow::{Context, Result};
use clap::Parser;
use infra_host::context::BootstrapContext;
use infra_host::return_code;
use infra_sdk::InfraSettings;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "infra-host", version, about = "Runs the infrastructure bootstrap steps")]
struct Args {
    /// JSON settings file. Environment variables override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the ordered steps and exit without running them.
    #[arg(long)]
    list: bool,
}

fn load_settings(path: Option<&PathBuf>) -> Result<InfraSettings> {
    let mut settings = match path {
        Some(path) => InfraSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => InfraSettings::default(),
    };
    settings.apply_env();
    Ok(settings)
}

fn init_tracing(settings: &InfraSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let writer = if settings.print_log_to_stdout {
        BoxMakeWriter::new(std::io::stdout)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
}

fn main() {
    let args = Args::parse();

    let settings = match load_settings(args.settings.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(return_code::CONFIGURATION_ERROR);
        }
    };

    init_tracing(&settings);

    tracing::info!("Host process starting.");
    tracing::info!("  Version = {}", env!("CARGO_PKG_VERSION"));

    let context = Arc::new(BootstrapContext::new(settings));

    let exit_code = if args.list {
        match infra_initializer::StepsLoader::load(&infra_host::steps_loader(&context)) {
            Ok(sequence) => {
                for (priority, summary) in sequence.summaries() {
                    println!("{priority:>6}  {summary}");
                }
                return_code::SUCCESS
            }
            Err(e) => {
                tracing::error!("Failed to load steps: {}", e);
                return_code::CONFIGURATION_ERROR
            }
        }
    } else {
        infra_host::run_session(context)
    };

    tracing::info!("Host exiting with code {}", exit_code);
    std::process::exit(exit_code);
}
