use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::config::{CliConfig, TokenStoreKind};
use crate::error::CliError;
use crate::token_store::CliTokenStore;

#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub api_base_url: Option<String>,
    pub token_store: &'static str,
    pub token_location: String,
    pub timeout_secs: u64,
}

pub fn run_config(command: ConfigCommands, api_url: Option<String>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            token_store,
            timeout_secs,
        } => {
            let mut config = CliConfig::load().map_err(CliError::Config)?;
            apply_init(&mut config, api_url, token_store, timeout_secs)?;
            let path = config.save().map_err(CliError::Config)?;
            println!("Saved config to {}", path.display());
            Ok(())
        }
        ConfigCommands::Show { json } => {
            let config = CliConfig::load()
                .and_then(|config| config.with_overrides(api_url))
                .map_err(CliError::Config)?;
            let report = config_report(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in format_config_lines(&report) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

/// Merge `config init` flags into `config`, validating the API URL.
pub fn apply_init(
    config: &mut CliConfig,
    api_url: Option<String>,
    token_store: Option<TokenStoreKind>,
    timeout_secs: Option<u64>,
) -> Result<(), CliError> {
    config.version = 1;
    if let Some(url) = api_url {
        let normalized = tallyho_core::config::normalize_api_base_url(&url)?;
        config.api_base_url = Some(normalized);
    }
    if token_store.is_some() {
        config.token_store = token_store;
    }
    if let Some(secs) = timeout_secs {
        if secs == 0 {
            return Err(CliError::Config(
                "--timeout-secs must be greater than zero".to_string(),
            ));
        }
        config.timeout_secs = Some(secs);
    }
    Ok(())
}

pub fn config_report(config: &CliConfig) -> Result<ConfigReport, CliError> {
    Ok(ConfigReport {
        api_base_url: config.api_base_url.clone(),
        token_store: config.token_store_kind().as_str(),
        token_location: CliTokenStore::from_config(config)?.describe(),
        timeout_secs: config
            .timeout_secs
            .unwrap_or(tallyho_core::config::DEFAULT_TIMEOUT_SECS),
    })
}

pub fn format_config_lines(report: &ConfigReport) -> Vec<String> {
    vec![
        format!(
            "api_base_url   {}",
            report.api_base_url.as_deref().unwrap_or("(not set)")
        ),
        format!(
            "token_store    {} ({})",
            report.token_store, report.token_location
        ),
        format!("timeout_secs   {}", report.timeout_secs),
    ]
}
