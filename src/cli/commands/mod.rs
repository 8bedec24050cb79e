pub mod complete;
pub mod env;
pub mod fetch;
pub mod job_card;
pub mod materials;
pub mod output;
pub mod stage;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::cli::ui::with_spinner;
use prodtrack_cli::api::{ClientManager, ResilienceConfig, SheetsClient};
use prodtrack_cli::config::Config;
use prodtrack_cli::workflow::{
    DeliveryOrder, ProductionOrder, SheetLayout, decode_delivery_orders, decode_job_cards,
    decode_orders, enrich_with_job_cards,
};

/// Client for `--env`, the current environment, or `PRODTRACK_*` variables
/// when no environment is configured
pub fn resolve_client(config: &Config, env: Option<&str>) -> Result<SheetsClient> {
    if config.environments.is_empty() && env.is_none() {
        debug!("No configured environments, falling back to environment variables");
        return ClientManager::from_env()
            .context("No environments configured. Add one with 'prodtrack-cli env add'")?
            .with_resilience(ResilienceConfig::from_settings(&config.settings))
            .get_current_client();
    }
    ClientManager::from_config(config).resolve_client(env)
}

/// Production orders with job card fields merged in
pub async fn load_orders(
    client: &SheetsClient,
    layout: &SheetLayout,
) -> Result<Vec<ProductionOrder>> {
    let (production, job_cards) = with_spinner("Fetching production orders...", async {
        tokio::join!(
            client.fetch_table(&layout.production.sheet),
            client.fetch_table(&layout.job_cards.sheet)
        )
    })
    .await;

    let production = production
        .with_context(|| format!("Failed to fetch sheet '{}'", layout.production.sheet))?;
    let mut orders = decode_orders(&production, &layout.production);

    match job_cards {
        Ok(table) => {
            let cards = decode_job_cards(&table, &layout.job_cards);
            enrich_with_job_cards(&mut orders, &cards);
        }
        Err(e) => warn!(
            "Could not fetch '{}', showing orders without job card details: {:#}",
            layout.job_cards.sheet, e
        ),
    }

    Ok(orders)
}

/// Delivery orders, or none when the sheet can't be read
pub async fn load_delivery_orders(
    client: &SheetsClient,
    layout: &SheetLayout,
) -> Vec<DeliveryOrder> {
    match client.fetch_table(&layout.delivery_orders.sheet).await {
        Ok(table) => decode_delivery_orders(&table, &layout.delivery_orders),
        Err(e) => {
            warn!(
                "Could not fetch '{}', showing orders without delivery details: {:#}",
                layout.delivery_orders.sheet, e
            );
            Vec::new()
        }
    }
}

/// Find an order by job card number, ignoring case and surrounding space
pub fn find_order<'a>(
    orders: &'a [ProductionOrder],
    job_card_no: &str,
) -> Result<&'a ProductionOrder> {
    let wanted = job_card_no.trim();
    orders
        .iter()
        .find(|o| o.job_card_no.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| anyhow::anyhow!("Job card '{}' not found", wanted))
}

pub fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn opt_number(value: Option<f64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}
