pub mod cli;
pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{validate_required_setting, validate_url};

#[cfg(feature = "cli")]
use clap::Parser;

/// Local invoker for the serverless functions.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "bikawo-functions")]
#[command(about = "Run a Bikawo serverless function locally against a JSON payload")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "bikawo.toml")]
    pub config: String,

    /// JSON request file (`{"action": ..., "payload": ...}`); reads stdin when omitted
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Override the storage directory from the config file
    #[arg(long)]
    pub storage_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Validate and plan a checkout without calling any remote service
    #[arg(long)]
    pub dry_run: bool,
}

/// Checks shared by every configuration source.
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("database.url", config.database_url())?;
    validate_required_setting("database.api_key", config.database_api_key())?;

    validate_url("payment.api_base", config.payment_api_base())?;
    validate_required_setting("payment.secret_key", config.payment_secret_key())?;
    validate_url("payment.success_url", config.checkout_success_url())?;
    validate_url("payment.cancel_url", config.checkout_cancel_url())?;

    let currency = config.currency();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(AppError::InvalidConfigValueError {
            field: "payment.currency".to_string(),
            value: currency.to_string(),
            reason: "Currency must be a lowercase ISO 4217 code, e.g. 'eur'".to_string(),
        });
    }

    validate_url("email.api_base", config.email_api_base())?;
    validate_required_setting("email.api_key", config.email_api_key())?;
    validate_required_setting("email.sender", config.email_sender())?;

    tracing::debug!("✅ Configuration validation passed");
    Ok(())
}
