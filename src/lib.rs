pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::S3Storage;
pub use config::lambda::LambdaConfig;

pub use adapters::http_backends;
pub use config::toml_config::TomlConfig;
pub use core::endpoint::{Backends, FunctionRequest, FunctionResponse, Functions};
pub use utils::error::{AppError, Result};
