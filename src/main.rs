use anyhow::Result;
use clap::Parser;
use log::{debug, info};

mod cli;

use cli::commands::{
    complete::handle_complete_command, env::handle_env_command, fetch::handle_fetch_command,
    job_card::handle_job_card_command, materials::handle_materials_command, resolve_client,
    stage::handle_stage_command,
};
use cli::{Cli, Commands};
use prodtrack_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("prodtrack-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting prodtrack-cli");

    let mut config = Config::load()?;
    debug!("Using layout for sheet '{}'", config.layout.production.sheet);

    let env = cli.env.as_deref();
    match cli.command {
        Commands::Env(cmd) => handle_env_command(cmd, &mut config),
        Commands::Fetch(args) => {
            let client = resolve_client(&config, env)?;
            handle_fetch_command(args, &client).await
        }
        Commands::Stage(args) => {
            let client = resolve_client(&config, env)?;
            handle_stage_command(args, &client, &config.layout).await
        }
        Commands::Complete(args) => {
            let client = resolve_client(&config, env)?;
            handle_complete_command(args, &client, &config).await
        }
        Commands::Materials(args) => {
            let client = resolve_client(&config, env)?;
            handle_materials_command(args, &client, &config.layout).await
        }
        Commands::JobCard(cmd) => {
            let client = resolve_client(&config, env)?;
            handle_job_card_command(cmd, &client, &config).await
        }
    }
}
