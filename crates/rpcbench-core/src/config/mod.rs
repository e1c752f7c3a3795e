//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `RPCBENCH_CONFIG` env var
//! 3. **Environment variables**: `RPCBENCH__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`BenchmarkConfig`]: chain, precision mode, request type, pauses and deadlines
//! - [`HttpClientConfig`]: per-request and connect timeouts
//! - [`ScoringConfig`]: factor weights and cost volume
//! - [`ConsensusConfig`]: `[[consensus.targets]]` registry
//! - [`PortfolioConfig`]: wallet, tracked tokens, latency budget
//! - [`NetworksConfig`]: `[[networks.endpoints]]` table
//! - [`LoggingConfig`]: Log level and format
//!
//! # Validation
//!
//! [`AppConfig::validate`] rejects configurations the engine cannot run (empty endpoint table,
//! malformed URLs, zero deadlines, malformed addresses) instead of failing mid-round.
//!
//! # Example
//!
//! ```toml
//! [benchmark]
//! chain = "ethereum"
//! precision = "robust"
//!
//! [[networks.endpoints]]
//! chain = "ethereum"
//! provider = "infura"
//! url = "https://mainnet.infura.io/v3/YOUR_API_KEY"
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

use crate::{
    adapters::{BenchError, HttpClientConfig},
    consensus::ConsensusConfig,
    network::{Chain, EndpointConfig, NetworkConfig, ProviderId},
    portfolio::PortfolioConfig,
    probe::{stats::DEFAULT_HISTORY_SIZE, PrecisionMode, ProbeSettings, RequestType},
    scoring::ScoringConfig,
    utils::abi::{encode_call, parse_address},
};

/// Benchmark round settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Chain benchmarked by default. Defaults to `ethereum`.
    #[serde(default)]
    pub chain: Chain,

    #[serde(default)]
    pub precision: PrecisionMode,

    #[serde(default)]
    pub request_type: RequestType,

    /// Pause between sequential rounds of one provider. Defaults to `100`.
    #[serde(default = "default_inter_round_pause_ms")]
    pub inter_round_pause_ms: u64,

    /// Upper bound on one provider's branch of a round. Defaults to `60000`.
    #[serde(default = "default_round_deadline_ms")]
    pub round_deadline_ms: u64,

    /// Samples kept in each provider's rolling history. Defaults to `20`.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_inter_round_pause_ms() -> u64 {
    100
}

fn default_round_deadline_ms() -> u64 {
    60_000
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

/// The endpoint table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworksConfig {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset. Defaults to `info`.
    pub level: String,
    /// `pretty` or `json`. Defaults to `pretty`.
    pub format: String,
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    #[serde(default)]
    pub http: HttpClientConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub consensus: ConsensusConfig,

    #[serde(default)]
    pub portfolio: PortfolioConfig,

    #[serde(default)]
    pub networks: NetworksConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            chain: Chain::Ethereum,
            precision: PrecisionMode::Standard,
            request_type: RequestType::Light,
            inter_round_pause_ms: 100,
            round_deadline_ms: 60_000,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

impl Default for NetworksConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                EndpointConfig::rpc(
                    Chain::Ethereum,
                    ProviderId::Infura,
                    "https://mainnet.infura.io/v3/YOUR_API_KEY",
                ),
                EndpointConfig::rpc(
                    Chain::Ethereum,
                    ProviderId::Alchemy,
                    "https://eth-mainnet.g.alchemy.com/v2/YOUR_API_KEY",
                ),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// Environment variables with the `RPCBENCH__` prefix can override any scalar value.
    /// Use `__` as a separator for nested fields (e.g., `RPCBENCH__BENCHMARK__PRECISION=robust`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("benchmark.chain", "ethereum")?
            .set_default("benchmark.precision", "standard")?
            .set_default("benchmark.request_type", "light")?
            .set_default("benchmark.inter_round_pause_ms", 100)?
            .set_default("benchmark.round_deadline_ms", 60_000)?
            .set_default("benchmark.history_size", 20)?
            .set_default("http.request_timeout_ms", 10_000)?
            .set_default("http.connect_timeout_ms", 5_000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("RPCBENCH").prefix_separator("__").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml` with fallback to defaults.
    ///
    /// The config file path can be overridden using the `RPCBENCH_CONFIG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("RPCBENCH_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Parsed endpoint table.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidEndpoint`] for a malformed or duplicated row.
    pub fn network_config(&self) -> Result<NetworkConfig, BenchError> {
        NetworkConfig::from_configs(&self.networks.endpoints)
    }

    #[must_use]
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            precision: self.benchmark.precision,
            request_type: self.benchmark.request_type,
            inter_round_pause: Duration::from_millis(self.benchmark.inter_round_pause_ms),
            round_deadline: Duration::from_millis(self.benchmark.round_deadline_ms),
        }
    }

    /// Validates the configuration, checking that:
    /// - At least one endpoint is configured, every URL parses and no pair repeats
    /// - Deadlines and the history size are greater than zero
    /// - Scoring weights and the request volume are not negative
    /// - Wallet, token and contract addresses are well formed
    /// - Every consensus target encodes against its method signature
    /// - Logging format is either `"json"` or `"pretty"`
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.networks.endpoints.is_empty() {
            return Err("No provider endpoints configured".to_string());
        }
        self.network_config().map_err(|e| e.to_string())?;

        if self.http.request_timeout_ms == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.http.connect_timeout_ms == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }
        if self.benchmark.round_deadline_ms == 0 {
            return Err("Round deadline must be greater than 0".to_string());
        }
        if self.benchmark.history_size == 0 {
            return Err("History size must be greater than 0".to_string());
        }

        let weights = &self.scoring.weights;
        if [weights.latency, weights.uptime, weights.lag, weights.p99]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err("Scoring weights must be finite and not negative".to_string());
        }
        if !self.scoring.request_volume_millions.is_finite() ||
            self.scoring.request_volume_millions < 0.0
        {
            return Err("Request volume must be finite and not negative".to_string());
        }

        parse_address(&self.portfolio.wallet).map_err(|e| format!("portfolio wallet: {e}"))?;
        for token in &self.portfolio.tracked_tokens {
            parse_address(token).map_err(|e| format!("portfolio token: {e}"))?;
        }

        for target in &self.consensus.targets {
            parse_address(&target.contract).map_err(|e| {
                format!("consensus target {}/{}: {e}", target.chain, target.asset)
            })?;
            encode_call(target.method, &target.params).map_err(|e| {
                format!("consensus target {}/{}: {e}", target.chain, target.asset)
            })?;
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }
}
