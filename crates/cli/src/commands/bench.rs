use clap::Args;
use prettytable::{row, Table};
use rpcbench_core::{
    config::AppConfig,
    probe::{PrecisionMode, RequestType},
    BenchmarkEngine, Chain, LeaderboardSnapshot,
};

use super::utils::{or_dash, print_info, print_json, print_success, CliResult};

#[derive(Args)]
pub struct BenchArgs {
    /// Chain to benchmark (defaults to `benchmark.chain`)
    #[arg(long)]
    pub chain: Option<Chain>,

    /// Rounds per provider: standard (2) or robust (5)
    #[arg(long)]
    pub precision: Option<PrecisionMode>,

    /// light (eth_blockNumber) or heavy (full latest block)
    #[arg(long)]
    pub request_type: Option<RequestType>,

    /// Number of benchmark rounds to run back to back
    #[arg(long, default_value = "1")]
    pub rounds: u32,

    /// Print the final snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_bench_command(args: BenchArgs, mut config: AppConfig) -> CliResult<()> {
    if let Some(chain) = args.chain {
        config.benchmark.chain = chain;
    }
    if let Some(precision) = args.precision {
        config.benchmark.precision = precision;
    }
    if let Some(request_type) = args.request_type {
        config.benchmark.request_type = request_type;
    }

    let engine = BenchmarkEngine::from_config(&config)?;

    let mut snapshot = engine.leaderboard().snapshot();
    for _ in 0..args.rounds.max(1) {
        if !args.json {
            print_info(&format!(
                "Benchmarking {} providers on {} ({} mode)...",
                engine.providers().len(),
                engine.chain(),
                config.benchmark.precision
            ));
        }
        snapshot = engine.run_round().await;
    }

    if args.json {
        return print_json(&*snapshot);
    }

    print_leaderboard(&snapshot);
    Ok(())
}

fn print_leaderboard(snapshot: &LeaderboardSnapshot) {
    let mut table = Table::new();
    table.add_row(row![
        "Rank", "Provider", "Score", "P50", "P99", "Uptime", "Lag", "Height", "Batch", "Archive",
        "Gas (gwei)", "Security", "Cost ($)"
    ]);

    for (rank, record) in snapshot.records.iter().enumerate() {
        table.add_row(row![
            rank + 1,
            record.name,
            record.score,
            format!("{}ms", record.latency),
            format!("{}ms", record.p99),
            format!("{}%", record.uptime),
            record.lag,
            or_dash(record.block_height),
            or_dash(record.batch_latency.map(|ms| format!("{ms}ms"))),
            or_dash(record.archive.map(|a| if a { "yes" } else { "no" })),
            or_dash(record.gas.map(|g| format!("{g:.2}"))),
            record.security_score,
            record.calculated_cost,
        ]);
    }

    table.printstd();

    for record in snapshot.records.iter().filter(|r| !r.security_issues.is_empty()) {
        println!("  {}: {}", record.name, record.security_issues.join(", "));
    }

    if snapshot.winner.is_placeholder() {
        print_info(&format!("Winner: {}", snapshot.winner.name));
    } else {
        print_success(&format!(
            "Winner (round {}): {} with score {}",
            snapshot.round, snapshot.winner.name, snapshot.winner.score
        ));
    }
}
