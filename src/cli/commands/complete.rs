//! Stage completion write-back

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use log::info;

use super::{find_order, load_orders};
use crate::cli::ui::with_spinner;
use prodtrack_cli::api::{Operations, SheetsClient};
use prodtrack_cli::config::Config;
use prodtrack_cli::sheet::{format_sheet_datetime, parse_sheet_date};
use prodtrack_cli::workflow::{Stage, StageState, StageUpdate};

#[derive(Args)]
pub struct CompleteCommands {
    /// costing, lab-test, kitting, approval or tally
    pub stage: Stage,

    /// Job card numbers of the orders
    #[arg(required = true)]
    pub job_cards: Vec<String>,

    /// Status to record (e.g. 'Approved', 'Rejected')
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub remarks: Option<String>,

    /// Completion time as dd/mm/yyyy [hh:mm[:ss]]; defaults to now
    #[arg(long)]
    pub at: Option<String>,

    /// Address the sheet row directly instead of letting the web-hook look
    /// up the job card
    #[arg(long)]
    pub by_row: bool,

    /// Overwrite a stage that is already complete, or move on an order
    /// whose previous stage was rejected
    #[arg(long)]
    pub force: bool,

    /// Print the requests instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_complete_command(
    args: CompleteCommands,
    client: &SheetsClient,
    config: &Config,
) -> Result<()> {
    let layout = &config.layout.production;
    let orders = load_orders(client, &config.layout).await?;

    let actual = match &args.at {
        Some(text) => parse_sheet_date(text)
            .with_context(|| format!("Could not read '{}' as a date (dd/mm/yyyy hh:mm)", text))?,
        None => config.now_local()?,
    };

    let mut update = StageUpdate::new(args.stage, actual).after_rejection(args.force);
    if let Some(status) = &args.status {
        update = update.status(status.clone());
    }
    if let Some(remarks) = &args.remarks {
        update = update.remarks(remarks.clone());
    }

    // Validate everything before sending anything
    let mut operations = Operations::new();
    let mut job_cards = Vec::with_capacity(args.job_cards.len());
    for job_card in &args.job_cards {
        let order = find_order(&orders, job_card)?;
        if order.stage(args.stage).state() == StageState::Complete && !args.force {
            anyhow::bail!(
                "{} is already complete for {}; pass --force to overwrite",
                args.stage,
                order.job_card_no
            );
        }

        let operation = if args.by_row {
            update.for_row(order, layout)?
        } else {
            update.for_job_card(order, layout)?
        };
        operations = operations.add(operation);
        job_cards.push(order.job_card_no.clone());
    }

    if args.dry_run {
        println!("🔍 {}", "Dry run, nothing sent:".dimmed());
        for operation in &operations {
            println!();
            for (field, value) in operation.to_form_fields()? {
                println!("  {} = {}", field.cyan(), value);
            }
        }
        return Ok(());
    }

    info!("Completing {} for {} order(s)", args.stage, operations.len());
    let results = with_spinner("Saving...", operations.execute(client))
        .await
        .with_context(|| format!("Failed to complete {}", args.stage))?;

    let mut failed = None;
    for (job_card, result) in job_cards.iter().zip(&results) {
        if result.is_success() {
            println!(
                "{} {} marked done for {} at {}",
                "✓".bright_green().bold(),
                args.stage.label().bright_white().bold(),
                job_card.bright_green().bold(),
                format_sheet_datetime(actual)
            );
        } else {
            let error = result.error.clone().unwrap_or_default();
            println!("{} {}: {}", "✗".bright_red().bold(), job_card.bright_red(), error);
            failed = Some(job_card.clone());
        }
    }

    let not_sent = job_cards.len() - results.len();
    if not_sent > 0 {
        println!("{} {} order(s) not sent", "⚠️".bright_yellow().bold(), not_sent);
    }
    if let Some(job_card) = failed {
        anyhow::bail!("Web-hook rejected the update for {}", job_card);
    }
    Ok(())
}
