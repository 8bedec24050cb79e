use anyhow::Result;
use clap::Args;
use colored::*;
use serde_json::json;

use super::output::{OutputArgs, Report, emit};
use super::{find_order, load_orders, opt_text};
use prodtrack_cli::api::SheetsClient;
use prodtrack_cli::workflow::SheetLayout;

#[derive(Args)]
pub struct MaterialsCommands {
    /// Job card number of the order
    pub job_card: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn handle_materials_command(
    args: MaterialsCommands,
    client: &SheetsClient,
    layout: &SheetLayout,
) -> Result<()> {
    let orders = load_orders(client, layout).await?;
    let order = find_order(&orders, &args.job_card)?;

    eprintln!(
        "🧪 {} {} ({})",
        order.job_card_no.bright_white().bold(),
        opt_text(&order.product_name).cyan(),
        opt_text(&order.unit).dimmed()
    );

    let rows = order
        .raw_materials
        .iter()
        .enumerate()
        .map(|(i, m)| {
            vec![
                (i + 1).to_string(),
                m.name.clone(),
                m.quantity
                    .map(|q| q.to_string())
                    .or_else(|| m.quantity_text.clone())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let report = Report::new(
        &["#", "Material", "Quantity"],
        rows,
        json!({
            "job_card_no": order.job_card_no,
            "raw_materials": order.raw_materials,
        }),
    );
    emit(&args.output, &report)
}
