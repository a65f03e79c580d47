//! Black-box conformance checks for the `/device` endpoint.
//!
//! Every [`Scenario`] reseeds the fixture database, sends one request and
//! checks status and body shape. Scenarios run sequentially and share nothing
//! but the database, which is wiped before each one.

mod client;
mod error;
mod fixtures;
mod scenarios;

pub use client::*;
pub use error::*;
pub use fixtures::*;
pub use scenarios::*;

use std::time::Duration;

/// Where the checker sends requests and which credentials it uses.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Base URL that `/device` is appended to
    pub api_url: String,
    /// Sent verbatim in the Authorization header
    pub api_key: String,
    /// Base URL that `/rpc/{name}` is appended to
    pub fixture_url: String,
    pub service_key: String,
    pub timeout: Duration,
}

pub struct Harness {
    pub api: DeviceClient,
    pub fixtures: FixtureClient,
}

impl Harness {
    pub fn new(config: &ContractConfig) -> Result<Self> {
        Ok(Self {
            api: DeviceClient::new(&config.api_url, &config.api_key, config.timeout)?,
            fixtures: FixtureClient::new(&config.fixture_url, &config.service_key, config.timeout)?,
        })
    }
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub result: Result<()>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `scenarios` one after another, logging each result.
pub async fn run_scenarios(harness: &Harness, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
    let mut outcomes = Vec::with_capacity(scenarios.len());

    for &scenario in scenarios {
        let result = scenario.run(harness).await;
        match &result {
            Ok(()) => tracing::info!(scenario = scenario.as_ref(), "PASS {}", scenario.title()),
            Err(e) => tracing::error!(
                scenario = scenario.as_ref(),
                fixture_failure = e.is_fixture_failure(),
                "FAIL {}: {}",
                scenario.title(),
                e
            ),
        }
        outcomes.push(ScenarioOutcome { scenario, result });
    }

    outcomes
}
