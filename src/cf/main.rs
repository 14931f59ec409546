use cf::actors::ConfigActor;
use cf::cloudcontroller::HttpCloudControllerClient;
use cf::commands::api::ApiCommand;
use cf::config::{config_dir, Config};
use cf::error::{CfError, Result};
use clap::Parser;
use termtext::Ui;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

const LOG_ENV: &str = "CF_LOG";

fn main() {
    init_logging();
    match run() {
        Ok(()) => {}
        Err(CfError::Failed) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Diagnostics go to stderr so they never interleave with command output.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = config_dir()?;
    let config = Config::load(&config_dir)?;
    let mut ui = Ui::new(&config)?;
    let mut actor = ConfigActor::new(config, HttpCloudControllerClient::new());

    let result = match cli.command {
        Commands::Api {
            url,
            skip_ssl_validation,
            unset,
        } => ApiCommand {
            url,
            skip_ssl_validation,
            unset,
        }
        .execute(&mut ui, &mut actor),
    };

    match result {
        Ok(()) => actor.into_config().save(&config_dir),
        Err(CfError::Failed) => {
            ui.display_failed()?;
            Err(CfError::Failed)
        }
        Err(e) => Err(e),
    }
}
