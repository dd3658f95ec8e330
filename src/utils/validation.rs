use crate::utils::error::{AppError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

const EMAIL_MAX_LENGTH: usize = 254;

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Config-side check: secrets and identifiers that must be present.
pub fn validate_required_setting(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

/// Form-side check: a user-provided field that must not be blank.
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(
            field_name,
            format!("{} is required", field_name),
        ));
    }
    Ok(())
}

pub fn validate_max_length(field_name: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(AppError::validation(
            field_name,
            format!("{} must be at most {} characters", field_name, max),
        ));
    }
    Ok(())
}

pub fn validate_min_length(field_name: &str, value: &str, min: usize) -> Result<()> {
    if value.trim().chars().count() < min {
        return Err(AppError::validation(
            field_name,
            format!("{} must be at least {} characters", field_name, min),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::validation(
            field_name,
            format!("{} must be between {} and {}", field_name, min, max),
        ));
    }
    Ok(())
}

pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || email.len() > EMAIL_MAX_LENGTH || !EMAIL_REGEX.is_match(email) {
        return Err(AppError::validation(field_name, "Invalid email address"));
    }
    Ok(())
}

/// Strips the usual separators (spaces, dots, dashes) before matching, so
/// "06 12 34 56 78" and "06.12.34.56.78" are both accepted.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect()
}

pub fn validate_phone(field_name: &str, phone: &str) -> Result<()> {
    if !PHONE_REGEX.is_match(&normalize_phone(phone)) {
        return Err(AppError::validation(
            field_name,
            "Phone number must contain 10 digits",
        ));
    }
    Ok(())
}

/// Returns the lowercased extension when it is one of `allowed_extensions`.
pub fn validate_file_extension(
    field_name: &str,
    file_name: &str,
    allowed_extensions: &[&str],
) -> Result<String> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| AppError::validation(field_name, "File has no extension"))?;

    if !allowed_extensions.contains(&extension.as_str()) {
        return Err(AppError::validation(
            field_name,
            format!(
                "Unsupported file type: {}. Allowed types: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        ));
    }

    Ok(extension)
}
