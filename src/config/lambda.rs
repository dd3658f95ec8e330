use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use std::env;

#[cfg(feature = "lambda")]
use crate::core::Storage;
#[cfg(feature = "lambda")]
use async_trait::async_trait;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;

/// Function settings read from the Lambda environment.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub database_url: String,
    pub database_api_key: String,
    pub payment_api_base: String,
    pub payment_secret_key: String,
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,
    pub currency: String,
    pub email_api_base: String,
    pub email_api_key: String,
    pub email_sender: String,
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub s3_region: String,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| AppError::ConfigError {
                message: format!("{} environment variable is required", key),
            })
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_api_key: required("DATABASE_API_KEY")?,
            payment_api_base: optional("PAYMENT_API_BASE", "https://api.stripe.com"),
            payment_secret_key: required("STRIPE_SECRET_KEY")?,
            checkout_success_url: required("CHECKOUT_SUCCESS_URL")?,
            checkout_cancel_url: required("CHECKOUT_CANCEL_URL")?,
            currency: optional("CURRENCY", "eur"),
            email_api_base: optional("EMAIL_API_BASE", "https://api.resend.com"),
            email_api_key: required("RESEND_API_KEY")?,
            email_sender: optional("EMAIL_SENDER", "Bikawo <contact@bikawo.com>"),
            s3_bucket: required("S3_BUCKET")?,
            s3_prefix: optional("S3_PREFIX", "documents"),
            s3_region: optional("S3_REGION", "eu-west-3"),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn database_url(&self) -> &str {
        &self.database_url
    }

    fn database_api_key(&self) -> &str {
        &self.database_api_key
    }

    fn payment_api_base(&self) -> &str {
        &self.payment_api_base
    }

    fn payment_secret_key(&self) -> &str {
        &self.payment_secret_key
    }

    fn checkout_success_url(&self) -> &str {
        &self.checkout_success_url
    }

    fn checkout_cancel_url(&self) -> &str {
        &self.checkout_cancel_url
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn email_api_base(&self) -> &str {
        &self.email_api_base
    }

    fn email_api_key(&self) -> &str {
        &self.email_api_key
    }

    fn email_sender(&self) -> &str {
        &self.email_sender
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        super::validate_settings(self)?;

        // 驗證S3 bucket名稱
        validate_s3_bucket_name("s3_bucket", &self.s3_bucket)?;

        // 驗證區域
        validate_aws_region("s3_region", &self.s3_region)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| AppError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    if region.is_empty()
        || !region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Document bucket; every key is stored under `prefix/`.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn key(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(feature = "lambda")]
#[async_trait]
impl Storage for S3Storage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.key(path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| AppError::StorageError {
                message: format!("Failed to write {} to S3: {}", key, e.into_service_error()),
            })?;

        tracing::debug!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
