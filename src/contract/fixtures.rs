use std::time::Duration;

use serde_json::json;

use super::error::{ContractError, Result};
use crate::handlers::rpc::Procedure;

/// Calls the seeding procedures on `{fixture_url}/rpc/{name}`.
#[derive(Debug, Clone)]
pub struct FixtureClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

/// Run in this order before every scenario.
pub const RESET_SEQUENCE: [Procedure; 2] =
    [Procedure::ResetAndSeedData, Procedure::ResetAndSeedStatsData];

impl FixtureClient {
    pub fn new(base_url: &str, service_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    /// Run one procedure. Any failure, transport included, is reported as a fixture error.
    pub async fn call(&self, procedure: Procedure) -> Result<()> {
        let name: &str = procedure.as_ref();
        let response = self
            .http
            .post(format!("{}/rpc/{}", self.base_url, name))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| ContractError::fixture_transport(name, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<failed to read response body: {}>", e),
        };

        Err(ContractError::Fixture {
            procedure: name.to_string(),
            status: Some(status.as_u16()),
            body,
            source: None,
        })
    }

    /// Wipe and reseed everything. Stops at the first failing procedure.
    pub async fn reset(&self) -> Result<()> {
        for procedure in RESET_SEQUENCE {
            self.call(procedure).await?;
        }
        Ok(())
    }
}
