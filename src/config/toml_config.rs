use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder regex"));

fn default_payment_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "eur".to_string()
}

fn default_email_api_base() -> String {
    "https://api.resend.com".to_string()
}

fn default_local_path() -> String {
    "./storage".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub database: DatabaseConfig,
    pub payment: PaymentConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_payment_api_base")]
    pub api_base: String,
    pub secret_key: String,
    pub success_url: String,
    pub cancel_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_email_api_base")]
    pub api_base: String,
    pub api_key: String,
    pub sender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STRIPE_SECRET_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn storage_path(&self) -> &str {
        &self.storage.local_path
    }
}

impl ConfigProvider for TomlConfig {
    fn database_url(&self) -> &str {
        &self.database.url
    }

    fn database_api_key(&self) -> &str {
        &self.database.api_key
    }

    fn payment_api_base(&self) -> &str {
        &self.payment.api_base
    }

    fn payment_secret_key(&self) -> &str {
        &self.payment.secret_key
    }

    fn checkout_success_url(&self) -> &str {
        &self.payment.success_url
    }

    fn checkout_cancel_url(&self) -> &str {
        &self.payment.cancel_url
    }

    fn currency(&self) -> &str {
        &self.payment.currency
    }

    fn email_api_base(&self) -> &str {
        &self.email.api_base
    }

    fn email_api_key(&self) -> &str {
        &self.email.api_key
    }

    fn email_sender(&self) -> &str {
        &self.email.sender
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        super::validate_settings(self)?;
        crate::utils::validation::validate_required_setting(
            "storage.local_path",
            &self.storage.local_path,
        )
    }
}
