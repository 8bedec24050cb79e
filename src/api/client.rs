use super::constants::{self, headers};
use super::error::ApiError;
use super::operations::{Operation, OperationResult};
use super::query::{Query, QueryResponse, QueryResult};
use super::resilience::{ResilienceConfig, RetryPolicy};
use crate::sheet::Table;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Instant;

/// Client for one spreadsheet: reads through the query endpoint, writes
/// through the web-hook script
#[derive(Clone)]
pub struct SheetsClient {
    spreadsheet_id: String,
    query_base_url: String,
    webhook_url: String,
    http_client: reqwest::Client,
    resilience: ResilienceConfig,
    read_policy: RetryPolicy,
    write_policy: RetryPolicy,
}

impl SheetsClient {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        webhook_url: impl Into<String>,
        resilience: ResilienceConfig,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(resilience.timeout)
            .connect_timeout(resilience.connect_timeout)
            .user_agent(constants::USER_AGENT)
            .build()?;

        Ok(Self::with_custom_client(
            spreadsheet_id,
            webhook_url,
            resilience,
            http_client,
        ))
    }

    pub fn with_custom_client(
        spreadsheet_id: impl Into<String>,
        webhook_url: impl Into<String>,
        resilience: ResilienceConfig,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            query_base_url: constants::QUERY_BASE_URL.to_string(),
            webhook_url: webhook_url.into(),
            http_client,
            read_policy: RetryPolicy::new(resilience.retry.clone()),
            write_policy: RetryPolicy::new(resilience.write_retry.clone()),
            resilience,
        }
    }

    /// Point reads at a different host (mirrors, local fixtures)
    pub fn with_query_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.query_base_url = base_url.into();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn resilience(&self) -> &ResilienceConfig {
        &self.resilience
    }

    pub fn query_url(&self) -> String {
        constants::query_endpoint(&self.query_base_url, &self.spreadsheet_id)
    }

    /// Run a sheet query
    pub async fn execute_query(&self, query: &Query) -> anyhow::Result<QueryResult> {
        let url = self.query_url();
        let params = query.to_query_params();
        let started = Instant::now();

        debug!("Querying sheet '{}' at {}", query.sheet, url);

        let response = self
            .read_policy
            .execute(|| async {
                self.http_client
                    .get(&url)
                    .query(&params)
                    .send()
                    .await?
                    .error_for_status()
            })
            .await
            .map_err(|e| {
                match e.downcast_ref::<reqwest::Error>().and_then(|re| re.status()) {
                    Some(status) => ApiError::HttpStatus {
                        status: status.as_u16(),
                        body: e.to_string(),
                    }
                    .into(),
                    None => e,
                }
            })?;

        let status_code = response.status().as_u16();
        let response_headers = collect_headers(&response);
        let body = response.text().await?;

        let table = QueryResponse::from_text(&body, query.headers)?;
        info!(
            "Fetched {} rows from '{}' in {:.0}ms",
            table.row_count(),
            query.sheet,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(QueryResult::new(table, status_code, response_headers))
    }

    /// Fetch every row of a sheet
    pub async fn fetch_table(&self, sheet: &str) -> anyhow::Result<Table> {
        Ok(self.execute_query(&Query::new(sheet)).await?.into_table())
    }

    /// Post a single write to the web-hook
    pub async fn execute(&self, operation: &Operation) -> anyhow::Result<OperationResult> {
        if self.webhook_url.trim().is_empty() {
            anyhow::bail!("No web-hook URL configured for spreadsheet {}", self.spreadsheet_id);
        }

        let form = operation.to_form_fields()?;
        let correlation_id = uuid::Uuid::new_v4().to_string();

        info!(
            "Sending {} to sheet '{}' [{}]",
            operation.action(),
            operation.sheet(),
            correlation_id
        );

        let response = self
            .write_policy
            .execute(|| async {
                self.http_client
                    .post(&self.webhook_url)
                    .header(headers::X_CORRELATION_ID, &correlation_id)
                    .form(&form)
                    .send()
                    .await
            })
            .await?;

        let status_code = response.status().as_u16();
        let body = response.text().await?;
        let result = OperationResult::from_response(operation.clone(), status_code, &body);

        if let Some(error) = &result.error {
            warn!(
                "{} on '{}' failed [{}]: {}",
                operation.action(),
                operation.sheet(),
                correlation_id,
                error
            );
        }

        Ok(result)
    }

    /// Post a single write and turn a rejected result into an error
    pub async fn execute_checked(&self, operation: &Operation) -> anyhow::Result<OperationResult> {
        let result = self.execute(operation).await?;
        if result.is_error() {
            let message = result.error.clone().unwrap_or_default();
            return Err(ApiError::WriteRejected(message).into());
        }
        Ok(result)
    }
}

fn collect_headers(response: &reqwest::Response) -> HashMap<String, String> {
    response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let client = SheetsClient::new("sheet-id", "https://hook", ResilienceConfig::disabled())
            .unwrap()
            .with_query_base_url("http://127.0.0.1:8080");
        assert_eq!(client.query_url(), "http://127.0.0.1:8080/sheet-id/gviz/tq");
        assert_eq!(client.spreadsheet_id(), "sheet-id");
    }

    #[tokio::test]
    async fn test_execute_without_webhook_fails() {
        let client = SheetsClient::new("sheet-id", "  ", ResilienceConfig::disabled()).unwrap();
        let op = Operation::insert("Job Cards", vec![]);
        assert!(client.execute(&op).await.is_err());
    }
}
