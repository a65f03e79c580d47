//! Runs the `/device` contract scenarios against a live server.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use devicelink::contract::{ContractConfig, Harness, Scenario, run_scenarios};
use devicelink::db::seed::fixtures::ALL_KEY;

#[derive(Debug, Parser)]
#[command(
    name = "device-contract",
    about = "Check a running devicelink server against the /device contract"
)]
struct Cli {
    /// Base URL of the server under test
    #[arg(long, env = "DEVICE_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Value sent in the Authorization header
    #[arg(long, env = "DEVICE_API_KEY", default_value = ALL_KEY)]
    api_key: String,

    /// Base URL of the seeding procedures (defaults to --api-url)
    #[arg(long, env = "FIXTURE_URL")]
    fixture_url: Option<String>,

    #[arg(long, env = "FIXTURE_SERVICE_KEY", default_value = "")]
    service_key: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Run only these scenarios (repeatable), e.g. --only link_device
    #[arg(long = "only")]
    only: Vec<Scenario>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "devicelink=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = ContractConfig {
        fixture_url: cli.fixture_url.unwrap_or_else(|| cli.api_url.clone()),
        api_url: cli.api_url,
        api_key: cli.api_key,
        service_key: cli.service_key,
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    let scenarios = if cli.only.is_empty() {
        Scenario::ALL.to_vec()
    } else {
        cli.only
    };

    let harness = Harness::new(&config)?;
    let outcomes = run_scenarios(&harness, &scenarios).await;

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    tracing::info!("{} passed, {} failed", outcomes.len() - failed, failed);

    if failed > 0 {
        anyhow::bail!("{} of {} scenarios failed", failed, outcomes.len());
    }
    Ok(())
}
