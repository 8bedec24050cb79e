use super::commands::complete::CompleteCommands;
use super::commands::env::EnvCommands;
use super::commands::fetch::FetchCommands;
use super::commands::job_card::JobCardCommands;
use super::commands::materials::MaterialsCommands;
use super::commands::stage::StageCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "prodtrack-cli")]
#[command(about = "Track production orders kept in a spreadsheet")]
pub struct Cli {
    /// Environment to use instead of the current one
    #[arg(long, global = true)]
    pub env: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Spreadsheet environment management
    #[command(subcommand)]
    Env(EnvCommands),
    /// Dump a sheet as it is stored
    Fetch(FetchCommands),
    /// Pending or completed orders for one workflow stage
    Stage(StageCommands),
    /// Record a stage as done for a job card
    Complete(CompleteCommands),
    /// Raw materials of a job card
    Materials(MaterialsCommands),
    /// Job card sheet operations
    #[command(subcommand)]
    JobCard(JobCardCommands),
}
