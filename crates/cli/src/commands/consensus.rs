use clap::Args;
use prettytable::{row, Table};
use rpcbench_core::{
    config::AppConfig,
    consensus::{AssetClass, ConsensusReport, ConsensusValidator},
    Chain, HttpClient, ProtocolAdapter,
};
use std::sync::Arc;

use super::utils::{or_dash, print_error, print_json, print_success, CliResult};

#[derive(Args)]
pub struct ConsensusArgs {
    /// fungible, non-fungible or multi-token
    #[arg(long)]
    pub asset: AssetClass,

    /// Chain to validate on (defaults to `benchmark.chain`)
    #[arg(long)]
    pub chain: Option<Chain>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_consensus_command(args: ConsensusArgs, config: AppConfig) -> CliResult<()> {
    let chain = args.chain.unwrap_or(config.benchmark.chain);
    let network = config.network_config()?;
    let client = Arc::new(HttpClient::with_config(config.http.clone())?);
    let validator = ConsensusValidator::new(ProtocolAdapter::new(client), config.consensus);

    let report =
        validator.validate_asset(&network, chain, args.asset, &network.providers()).await?;

    if args.json {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &ConsensusReport) {
    println!("{} {} on {}: {}", report.asset, report.contract, report.chain, report.method);

    let mut table = Table::new();
    table.add_row(row!["Provider", "Status", "Result", "Match", "Latency"]);

    for vote in &report.votes {
        let status = if vote.success { "ok" } else { "excluded" };
        let matched = match (vote.success, vote.is_mismatch) {
            (false, _) => "-",
            (true, false) => "yes",
            (true, true) => "MISMATCH",
        };
        table.add_row(row![
            vote.name,
            status,
            or_dash(vote.result.as_deref()),
            matched,
            format!("{}ms", vote.latency_ms),
        ]);
    }

    table.printstd();

    match &report.consensus {
        Some(value) => print_success(&format!(
            "Consensus: {value} ({}/{} providers agree)",
            report.agreement, report.participants
        )),
        None => print_error("No provider returned a usable result"),
    }
}
