use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use log::info;

use crate::cli::ui::with_spinner;
use prodtrack_cli::api::SheetsClient;
use prodtrack_cli::config::Config;
use prodtrack_cli::workflow::JobCardForm;

#[derive(Subcommand)]
pub enum JobCardCommands {
    /// Append a job card row
    Create {
        /// Job card number
        job_card: String,
        #[arg(long)]
        firm: Option<String>,
        #[arg(long)]
        party: Option<String>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        machine: Option<String>,
        #[arg(long)]
        supervisor: Option<String>,
        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

pub async fn handle_job_card_command(
    cmd: JobCardCommands,
    client: &SheetsClient,
    config: &Config,
) -> Result<()> {
    match cmd {
        JobCardCommands::Create {
            job_card,
            firm,
            party,
            product,
            quantity,
            machine,
            supervisor,
            dry_run,
        } => {
            let form = JobCardForm {
                job_card_no: job_card,
                firm_name: firm,
                party_name: party,
                product_name: product,
                quantity,
                machine,
                supervisor,
            };
            let job_card_no = form.job_card_no.trim().to_string();
            let operation = form.into_operation(&config.layout.job_cards, config.now_local()?)?;

            if dry_run {
                println!("🔍 {}", "Dry run, nothing sent:".dimmed());
                for (field, value) in operation.to_form_fields()? {
                    println!("  {} = {}", field.cyan(), value);
                }
                return Ok(());
            }

            info!("Creating job card {}", job_card_no);
            with_spinner("Saving job card...", client.execute_checked(&operation))
                .await
                .with_context(|| format!("Failed to create job card {}", job_card_no))?;

            println!(
                "{} Job card {} added to '{}'",
                "✓".bright_green().bold(),
                job_card_no.bright_green().bold(),
                operation.sheet()
            );
            Ok(())
        }
    }
}
