use anyhow::Result;
use clap::{Parser, Subcommand};
use rpcbench_core::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
use commands::{
    handle_bench_command, handle_config_command, handle_consensus_command,
    handle_portfolio_command, BenchArgs, ConfigCommands, ConsensusArgs, PortfolioArgs,
};

#[derive(Parser)]
#[command(name = "rpcbench")]
#[command(about = "rpcbench - Benchmark, validate and grade blockchain data providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (overrides RPCBENCH_CONFIG)
    #[arg(long, global = true, env = "RPCBENCH_CONFIG", default_value = "config/config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run benchmark rounds and print the leaderboard
    Bench(BenchArgs),

    /// Compare one contract read across providers
    Consensus(ConsensusArgs),

    /// Grade how efficiently each provider loads a wallet portfolio
    Portfolio(PortfolioArgs),

    /// Validate, print or generate the config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Initializes logging on stderr so `--json` output stays parseable.
///
/// `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &AppConfig) {
    let level = &config.logging.level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,rpcbench_core={level},rpcbench={level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).init();
    }
}

/// Loads and validates the configuration, then starts logging from it.
fn load_config(path: &str) -> Result<AppConfig> {
    let config = AppConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;
    config.validate().map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    init_logging(&config);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench(args) => handle_bench_command(args, load_config(&cli.config)?).await?,
        Commands::Consensus(args) => {
            handle_consensus_command(args, load_config(&cli.config)?).await?;
        }
        Commands::Portfolio(args) => {
            handle_portfolio_command(args, load_config(&cli.config)?).await?;
        }
        Commands::Config(config_command) => handle_config_command(config_command)?,
    }

    Ok(())
}
