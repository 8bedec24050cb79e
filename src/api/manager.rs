use std::collections::HashMap;

use super::client::SheetsClient;
use super::resilience::ResilienceConfig;
use crate::config::{Config, EnvironmentConfig};

pub const ENV_SPREADSHEET_ID: &str = "PRODTRACK_SPREADSHEET_ID";
pub const ENV_WEBHOOK_URL: &str = "PRODTRACK_WEBHOOK_URL";
pub const ENV_QUERY_BASE_URL: &str = "PRODTRACK_QUERY_BASE_URL";

/// Name given to the environment assembled from environment variables
pub const DOTENV_ENVIRONMENT: &str = ".env";

/// Resolves named environments into configured clients
pub struct ClientManager {
    environments: HashMap<String, EnvironmentConfig>,
    current_env: Option<String>,
    resilience: ResilienceConfig,
}

impl ClientManager {
    pub fn from_config(config: &Config) -> Self {
        Self {
            environments: config.environments.clone(),
            current_env: config.current_environment.clone(),
            resilience: ResilienceConfig::from_settings(&config.settings),
        }
    }

    /// Build a single `.env` environment from `PRODTRACK_*` variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let spreadsheet_id = std::env::var(ENV_SPREADSHEET_ID)
            .map_err(|_| anyhow::anyhow!("{} is not set", ENV_SPREADSHEET_ID))?;
        let webhook_url = std::env::var(ENV_WEBHOOK_URL).unwrap_or_default();
        let query_base_url = std::env::var(ENV_QUERY_BASE_URL).ok();

        let mut environments = HashMap::new();
        environments.insert(
            DOTENV_ENVIRONMENT.to_string(),
            EnvironmentConfig {
                spreadsheet_id,
                webhook_url,
                query_base_url,
            },
        );

        Ok(Self {
            environments,
            current_env: Some(DOTENV_ENVIRONMENT.to_string()),
            resilience: ResilienceConfig::default(),
        })
    }

    pub fn with_resilience(mut self, resilience: ResilienceConfig) -> Self {
        self.resilience = resilience;
        self
    }

    pub fn try_select_env(&self, name: &str) -> anyhow::Result<&EnvironmentConfig> {
        self.environments
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Environment '{}' not found", name))
    }

    pub fn list_environments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.environments.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn get_current_environment(&self) -> Option<&str> {
        self.current_env.as_deref()
    }

    pub fn get_client(&self, env_name: &str) -> anyhow::Result<SheetsClient> {
        let environment = self.try_select_env(env_name)?;
        let client = SheetsClient::new(
            environment.spreadsheet_id.clone(),
            environment.webhook_url.clone(),
            self.resilience.clone(),
        )?;

        Ok(match &environment.query_base_url {
            Some(base) => client.with_query_base_url(base.clone()),
            None => client,
        })
    }

    pub fn get_current_client(&self) -> anyhow::Result<SheetsClient> {
        let current_env = self.current_env.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No environment selected. Use 'prodtrack-cli env select' to choose one or pass --env."
            )
        })?;
        self.get_client(current_env)
    }

    /// Client for `env` if given, otherwise the current environment
    pub fn resolve_client(&self, env: Option<&str>) -> anyhow::Result<SheetsClient> {
        match env {
            Some(name) => self.get_client(name),
            None => self.get_current_client(),
        }
    }
}
