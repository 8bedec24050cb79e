//! Environment management

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use dialoguer::{Confirm, Select};
use is_terminal::IsTerminal;

use prodtrack_cli::config::{Config, EnvironmentConfig};

#[derive(Subcommand)]
pub enum EnvCommands {
    /// Add or replace an environment
    Add {
        /// Name for the environment (e.g. 'plant', 'staging')
        name: String,
        /// Spreadsheet id from the sheet URL
        #[arg(long)]
        spreadsheet_id: String,
        /// Deployed web-hook script URL
        #[arg(long)]
        webhook_url: String,
        /// Override the tabular-query base URL
        #[arg(long)]
        query_base_url: Option<String>,
        /// Make this the current environment
        #[arg(long)]
        select: bool,
    },
    /// List configured environments
    List,
    /// Select the current environment
    Select {
        /// Environment name; prompts when omitted
        name: Option<String>,
    },
    /// Remove an environment
    Remove {
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn handle_env_command(cmd: EnvCommands, config: &mut Config) -> Result<()> {
    match cmd {
        EnvCommands::Add {
            name,
            spreadsheet_id,
            webhook_url,
            query_base_url,
            select,
        } => {
            let environment = EnvironmentConfig {
                spreadsheet_id,
                webhook_url,
                query_base_url,
            };
            config.add_environment(name.clone(), environment)?;
            println!(
                "{} Environment '{}' saved",
                "✓".bright_green().bold(),
                name.bright_green().bold()
            );
            if select {
                select_environment(config, name)?;
            }
            Ok(())
        }
        EnvCommands::List => {
            list_environments(config);
            Ok(())
        }
        EnvCommands::Select { name: Some(name) } => select_environment(config, name),
        EnvCommands::Select { name: None } => select_environment_interactive(config),
        EnvCommands::Remove { name, yes } => remove_environment(config, &name, yes),
    }
}

fn list_environments(config: &Config) {
    let environments = config.list_environments();

    if environments.is_empty() {
        println!("  {}", "⚠️  No environments configured".bright_yellow().bold());
        println!("  {}", "Add one with 'prodtrack-cli env add'.".dimmed());
        return;
    }

    println!();
    println!("  {}", "Configured environments:".bright_white().bold());
    for name in environments {
        let Some(environment) = config.environments.get(name) else {
            continue;
        };
        let (marker, label, current_text) = if config.current_environment.as_ref() == Some(name) {
            ("●", name.bright_green().bold(), " (current)".bright_green())
        } else {
            ("○", name.white(), "".white())
        };
        println!(
            "  {} {} → {}{}",
            marker.bright_green(),
            label,
            environment.spreadsheet_id.cyan(),
            current_text
        );
    }
    println!();
}

fn select_environment(config: &mut Config, name: String) -> Result<()> {
    config.set_current_environment(name.clone())?;
    println!(
        "{} Set '{}' as current environment",
        "✓".bright_green().bold(),
        name.bright_green().bold()
    );
    Ok(())
}

fn select_environment_interactive(config: &mut Config) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("No environment name given. Usage: prodtrack-cli env select <name>");
    }

    let names: Vec<String> = config.list_environments().into_iter().cloned().collect();
    if names.is_empty() {
        println!("  {} No environments configured to select.", "⚠️".bright_yellow().bold());
        return Ok(());
    }

    let items: Vec<String> = names
        .iter()
        .map(|name| {
            if config.current_environment.as_ref() == Some(name) {
                format!("{} (current)", name)
            } else {
                name.clone()
            }
        })
        .collect();
    let default = names
        .iter()
        .position(|n| config.current_environment.as_ref() == Some(n))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select environment")
        .items(&items)
        .default(default)
        .interact()?;

    select_environment(config, names[selection].clone())
}

fn remove_environment(config: &mut Config, name: &str, yes: bool) -> Result<()> {
    if !config.environments.contains_key(name) {
        anyhow::bail!("Environment '{}' not found", name);
    }

    if !yes {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("Refusing to remove '{}' without --yes", name);
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove environment '{}'?", name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{} Cancelled.", "❌".bright_red().bold());
            return Ok(());
        }
    }

    config.remove_environment(name)?;
    println!("{} Environment '{}' removed", "✓".bright_green().bold(), name);
    Ok(())
}
