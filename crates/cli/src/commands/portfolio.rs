use clap::Args;
use prettytable::{row, Table};
use rpcbench_core::{
    config::AppConfig,
    portfolio::{PortfolioEngine, PortfolioRecord},
    Chain, HttpClient, ProtocolAdapter,
};
use std::sync::Arc;

use super::utils::{or_dash, print_info, print_json, CliError, CliResult};

#[derive(Args)]
pub struct PortfolioArgs {
    /// Wallet to load (defaults to `portfolio.wallet`)
    #[arg(long)]
    pub wallet: Option<String>,

    /// Chain to load it on (defaults to `portfolio.chain`)
    #[arg(long)]
    pub chain: Option<Chain>,

    /// Print the records as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_portfolio_command(args: PortfolioArgs, config: AppConfig) -> CliResult<()> {
    let mut portfolio = config.portfolio.clone();
    if let Some(wallet) = args.wallet {
        rpcbench_core::utils::abi::parse_address(&wallet)
            .map_err(|e| CliError::Config(e.to_string()))?;
        portfolio.wallet = wallet;
    }
    if let Some(chain) = args.chain {
        portfolio.chain = chain;
    }

    let network = config.network_config()?;
    let client = Arc::new(HttpClient::with_config(config.http.clone())?);
    let engine = PortfolioEngine::new(ProtocolAdapter::new(client), portfolio);

    if !args.json {
        print_info(&format!(
            "Loading portfolio {} on {}...",
            engine.config().wallet,
            engine.config().chain
        ));
    }

    let records = engine.run(&network, &network.providers()).await;

    if args.json {
        return print_json(&records);
    }

    print_records(&records);
    Ok(())
}

fn print_records(records: &[PortfolioRecord]) {
    let mut table = Table::new();
    table.add_row(row![
        "Provider", "Strategy", "Time", "Requests", "Richness", "Cost Units", "Impact", "Score",
        "Grade"
    ]);

    for record in records {
        let metrics = &record.metrics;
        table.add_row(row![
            record.name,
            or_dash(record.strategy.as_deref()),
            format!("{}ms", metrics.time_to_interactive_ms),
            metrics.requests_sent,
            metrics.data_richness_score,
            metrics.estimated_cost_units,
            metrics.builder_impact_rating,
            metrics.score_details.score,
            metrics.score_details.grade,
        ]);
    }

    table.printstd();

    for record in records {
        let entries: Vec<String> = record
            .metrics
            .score_details
            .breakdown
            .iter()
            .map(|e| format!("{} {:+}", e.reason, e.delta))
            .collect();
        println!("  {}: {}", record.name, entries.join(", "));
        if let Some(error) = &record.error {
            println!("    error: {error}");
        }
    }
}
