use reqwest::Client;
use serde_json::Value;

use crate::DEFAULT_API_VERSION;
use crate::auth::token::AccessToken;
use crate::error::ExtractError;
use crate::salesforce::parse::{Record, parse_records_from_response};
use crate::salesforce::soql::encode_query;

/// HTTP client for the Salesforce REST API of a single org.
pub struct ServiceClient {
    client: Client,
    instance_url: String,
    token: String,
    api_version: String,
}

impl ServiceClient {
    /// Create a new client for the given instance URL and access token.
    pub fn new(instance_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            instance_url: instance_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn from_token(token: &AccessToken) -> Self {
        Self::new(&token.instance_url, &token.access_token)
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    pub fn report_url(&self, report_id: &str) -> String {
        format!(
            "{}/services/data/{}/analytics/reports/{}",
            self.instance_url, self.api_version, report_id
        )
    }

    pub fn query_url(&self, soql: &str) -> String {
        format!(
            "{}/services/data/{}/query/{}",
            self.instance_url,
            self.api_version,
            encode_query(soql)
        )
    }

    /// Run an analytics report and return its raw JSON.
    pub async fn fetch_report(&self, report_id: &str) -> Result<Value, ExtractError> {
        log::info!("Fetching report data for report ID: {}...", report_id);
        let url = self.report_url(report_id);
        log::debug!("Url: {}", url);

        self.get_json(&url).await
    }

    /// Execute a SOQL query and return its records.
    pub async fn query(&self, soql: &str) -> Result<Vec<Record>, ExtractError> {
        log::info!("Querying customer references...");
        log::debug!("SOQL: {}", soql);
        let url = self.query_url(soql);
        log::debug!("Url: {}", url);

        let json = self.get_json(&url).await?;
        parse_records_from_response(&json)
    }

    async fn get_json(&self, url: &str) -> Result<Value, ExtractError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = resp.status();

        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            log::error!("Request failed with status code {}", status.as_u16());
            log::error!("Response: {}", body);
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}
