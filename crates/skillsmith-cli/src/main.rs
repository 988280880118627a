mod cli;
mod commands;
mod completions;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use skillsmith_core::HttpSkillService;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    let config = config::CliConfig::load();

    let service_for = |config: &config::CliConfig| -> Result<HttpSkillService> {
        let service_config = config.service_config(cli.api_url.as_deref(), cli.timeout)?;
        tracing::debug!(base_url = %service_config.base_url, "Using skill service");
        Ok(HttpSkillService::new(service_config))
    };

    match cli.command {
        Commands::Completions { shell } => {
            completions::generate_completions(shell);
            Ok(())
        }
        Commands::Create(args) => commands::create::run(&service_for(&config)?, args, format).await,
        Commands::List(args) => {
            commands::library::list(&service_for(&config)?, &config, args, format).await
        }
        Commands::Show { id } => {
            commands::library::show(&service_for(&config)?, &config, id, format).await
        }
        Commands::Update(args) => {
            commands::library::update(&service_for(&config)?, &config, args, format).await
        }
        Commands::Delete { id } => {
            commands::library::delete(&service_for(&config)?, &config, id, format).await
        }
        Commands::Download { id, out } => {
            commands::library::download(&service_for(&config)?, &config, id, out, format).await
        }
        Commands::Publish(args) => {
            commands::publish::run(&service_for(&config)?, &config, args, format).await
        }
        Commands::Config { command } => {
            commands::config::run(&config, command, cli.api_url.as_deref(), cli.timeout, format)
        }
    }
}

/// Log to a daily rolling file under the data directory. Logging is skipped when no
/// data directory is available.
fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    let log_dir = dirs::data_dir()?.join("skillsmith").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "skillsmith.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    Some(guard)
}
