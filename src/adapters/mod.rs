// Adapters layer: HTTP implementations of the domain ports.

pub mod http;
pub mod mailer;
pub mod payment;
pub mod rest_db;

pub use mailer::ResendMailer;
pub use payment::StripeGateway;
pub use rest_db::RestDatabase;

use crate::core::endpoint::Backends;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::Result;
use std::sync::Arc;

/// Wires the HTTP adapters from configuration around the given storage backend.
pub fn http_backends<C: ConfigProvider>(config: &C, storage: Arc<dyn Storage>) -> Result<Backends> {
    Ok(Backends {
        database: Arc::new(RestDatabase::new(
            config.database_url(),
            config.database_api_key(),
        )?),
        payments: Arc::new(StripeGateway::new(
            config.payment_api_base(),
            config.payment_secret_key(),
        )?),
        mailer: Arc::new(ResendMailer::new(
            config.email_api_base(),
            config.email_api_key(),
            config.email_sender(),
        )?),
        storage,
    })
}
