use clap::Subcommand;
use rpcbench_core::{config::AppConfig, ProviderId};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use super::utils::{print_info, print_success, CliError, CliResult};

const SAMPLE_CONFIG: &str = include_str!("../../../../config/config.toml");
const MASK: &str = "********";

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Check that a config file loads and lists at least one usable endpoint
    Validate {
        #[arg(short, long, default_value = "config/config.toml")]
        file: PathBuf,
    },

    /// Print the effective configuration, defaults and env overrides included
    Show {
        #[arg(short, long, default_value = "config/config.toml")]
        file: PathBuf,

        /// Print API keys in clear text
        #[arg(long)]
        show_sensitive: bool,
    },

    /// Write the bundled sample configuration
    Generate {
        #[arg(short, long, default_value = "config/config.toml")]
        output: PathBuf,

        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Validate { file } => validate(&file),
        ConfigCommands::Show { file, show_sensitive } => show(&file, show_sensitive),
        ConfigCommands::Generate { output, force } => generate(&output, force),
    }
}

fn load(file: &Path) -> CliResult<AppConfig> {
    if !file.exists() {
        return Err(CliError::Config(format!("{} does not exist", file.display())));
    }
    AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))
}

fn validate(file: &Path) -> CliResult<()> {
    let config = load(file)?;
    config.validate().map_err(CliError::Config)?;
    let network = config.network_config()?;

    print_success(format_args!("{} is valid", file.display()));

    let mut chains_per_provider: BTreeMap<ProviderId, usize> = BTreeMap::new();
    for endpoint in network.endpoints() {
        *chains_per_provider.entry(endpoint.provider()).or_default() += 1;
    }
    for (provider, chains) in &chains_per_provider {
        print_info(format_args!("{provider}: {chains} chain(s)"));
    }

    print_info(format_args!(
        "bench on {} ({} precision, {} requests)",
        config.benchmark.chain, config.benchmark.precision, config.benchmark.request_type
    ));
    print_info(format_args!("{} consensus target(s)", config.consensus.targets.len()));
    print_info(format_args!(
        "portfolio wallet {} on {}, {} tracked token(s)",
        config.portfolio.wallet,
        config.portfolio.chain,
        config.portfolio.tracked_tokens.len()
    ));
    Ok(())
}

fn show(file: &Path, show_sensitive: bool) -> CliResult<()> {
    let mut config = load(file)?;
    if !show_sensitive {
        mask_keys(&mut config);
    }
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn mask_keys(config: &mut AppConfig) {
    for key in config.networks.endpoints.iter_mut().filter_map(|e| e.api_key.as_mut()) {
        MASK.clone_into(key);
    }
}

fn generate(output: &Path, force: bool) -> CliResult<()> {
    if output.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists, pass --force to replace it",
            output.display()
        )));
    }

    if let Some(dir) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(output, SAMPLE_CONFIG)?;

    print_success(format_args!("wrote {}", output.display()));
    print_info("replace the YOUR_API_KEY placeholders before running a benchmark");
    Ok(())
}
