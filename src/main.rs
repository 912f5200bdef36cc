//! Music Downloader - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use music_downloader::{
    api::{CatalogApi, HttpCatalog},
    cli::Args,
    config::{validate_config, Config},
    deps::check_dependencies,
    device::{bootstrap_devices, AdbTransport, DeviceTransport},
    download::ExternalRipper,
    error::{exit_codes, Error, Result},
    orchestrator::Orchestrator,
    output::{print_banner, print_config_summary, print_error, print_info},
    shell::Shell,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Api(_) | Error::Http(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                Error::MissingDependency(_) => ExitCode::from(exit_codes::DEPENDENCY_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load and validate configuration
    let config = Config::load_with_fallback(&args.config)?;
    validate_config(&config)?;
    let config = Arc::new(config);

    check_dependencies(&config).await?;

    let catalog: Arc<dyn CatalogApi> = Arc::new(HttpCatalog::new(&config)?);

    // Bring up devices; failures are logged and the device is left out
    print_info(&format!("Connecting to {} device(s)...", config.devices.len()));
    let pool = bootstrap_devices(&config.devices, |device| {
        Arc::new(AdbTransport::new(device)) as Arc<dyn DeviceTransport>
    })
    .await;
    print_config_summary(&config, &pool);

    let orchestrator =
        Orchestrator::connect(config, pool, catalog, Arc::new(ExternalRipper::new())).await?;

    Shell::new(orchestrator)
        .run(args.initial_command())
        .await?;
    Ok(())
}
