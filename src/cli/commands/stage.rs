use anyhow::Result;
use clap::Args;
use colored::*;
use serde_json::json;

use super::output::{OutputArgs, Report, emit};
use super::{load_delivery_orders, load_orders, opt_number, opt_text};
use prodtrack_cli::api::SheetsClient;
use prodtrack_cli::sheet::format_display_date;
use prodtrack_cli::workflow::{
    SheetLayout, Stage, StageItem, Stamp, attach_delivery_orders, classify,
};

#[derive(Args)]
pub struct StageCommands {
    /// costing, lab-test, kitting, approval or tally
    pub stage: Stage,

    /// Show completed orders instead of pending ones
    #[arg(long)]
    pub history: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn handle_stage_command(
    args: StageCommands,
    client: &SheetsClient,
    layout: &SheetLayout,
) -> Result<()> {
    let orders = load_orders(client, layout).await?;
    let delivery_orders = load_delivery_orders(client, layout).await;

    let buckets = classify(&orders, args.stage);
    eprintln!(
        "{} {}: {} pending, {} completed",
        "🏭".bright_white(),
        args.stage.label().bright_white().bold(),
        buckets.pending.len().to_string().bright_yellow(),
        buckets.history.len().to_string().bright_green()
    );

    let selected = if args.history {
        &buckets.history
    } else {
        &buckets.pending
    };
    let items = attach_delivery_orders(selected, &delivery_orders);

    emit(&args.output, &stage_report(args.stage, &items))
}

fn stamp_text(stamp: &Option<Stamp>) -> String {
    match stamp {
        Some(Stamp { at: Some(at), .. }) => format_display_date(*at),
        Some(Stamp { raw, .. }) => raw.clone(),
        None => String::new(),
    }
}

fn stage_report(stage: Stage, items: &[StageItem<'_>]) -> Report {
    let rows = items
        .iter()
        .map(|item| {
            let order = item.order;
            let entry = order.stage(stage);
            vec![
                order.job_card_no.clone(),
                opt_text(&order.firm_name),
                opt_text(&order.party_name),
                opt_text(&order.product_name),
                opt_number(order.quantity),
                opt_text(&order.machine),
                stamp_text(&entry.planned),
                stamp_text(&entry.actual),
                opt_text(&entry.status),
                item.delivery_order
                    .and_then(|d| d.transporter.clone())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let json = json!(
        items
            .iter()
            .map(|item| json!({
                "order": item.order,
                "stage": item.order.stage(stage),
                "delivery_order": item.delivery_order,
            }))
            .collect::<Vec<_>>()
    );

    Report::new(
        &[
            "Job Card",
            "Firm",
            "Party",
            "Product",
            "Qty",
            "Machine",
            "Planned",
            "Actual",
            "Status",
            "Transporter",
        ],
        rows,
        json,
    )
}
