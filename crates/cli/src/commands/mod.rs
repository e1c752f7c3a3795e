pub mod bench;
pub mod config;
pub mod consensus;
pub mod portfolio;
pub mod utils;

pub use bench::{handle_bench_command, BenchArgs};
pub use config::{handle_config_command, ConfigCommands};
pub use consensus::{handle_consensus_command, ConsensusArgs};
pub use portfolio::{handle_portfolio_command, PortfolioArgs};
