use anyhow::{anyhow, Context, Result};
use ipaymu_client::{IpaymuClient, IpaymuConfig, PaymentGateway};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ipaymu <account | balance | status <username> | transaction <id>>";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config_path = std::env::var("IPAYMU_CONFIG").ok();
    let config = IpaymuConfig::load(config_path.as_deref())?;

    tracing::info!("Using iPaymu gateway at {}", config.base_url);

    let client = IpaymuClient::new(config).context("Failed to create iPaymu client")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        ["account"] => match client.get_account().await {
            Ok(account) => print_json(&account),
            Err(e) => Err(e.into()),
        },
        ["balance"] => match client.check_account_balance().await {
            Ok(balance) => print_json(&balance),
            Err(e) => Err(e.into()),
        },
        ["status", username] => match client.check_account_status(username).await {
            Ok(status) => print_json(&status),
            Err(e) => Err(e.into()),
        },
        ["transaction", id] => match client.check_transaction(id).await {
            Ok(record) => print_json(&record),
            Err(e) => Err(e.into()),
        },
        _ => Err(anyhow!(USAGE)),
    };

    if outcome.is_err() && !client.errors().is_empty() {
        for entry in client.errors().entries() {
            tracing::error!("iPaymu error {}: {}", entry.code, entry.message);
        }
    }

    outcome
}
