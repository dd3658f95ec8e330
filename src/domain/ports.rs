use crate::domain::model::{CheckoutSession, CheckoutSessionRequest, OutgoingEmail};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Write-only object storage for uploaded documents and exports.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lt,
}

impl FilterOp {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<String>) -> Self {
        Self {
            column: column.to_string(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn gte(column: &str, value: impl Into<String>) -> Self {
        Self {
            column: column.to_string(),
            op: FilterOp::Gte,
            value: value.into(),
        }
    }

    pub fn lt(column: &str, value: impl Into<String>) -> Self {
        Self {
            column: column.to_string(),
            op: FilterOp::Lt,
            value: value.into(),
        }
    }

    /// PostgREST query pair, e.g. `("id", "eq.42")`.
    pub fn to_query_pair(&self) -> (String, String) {
        (
            self.column.clone(),
            format!("{}.{}", self.op.as_str(), self.value),
        )
    }
}

/// Row-level access to the hosted database.
#[async_trait]
pub trait Database: Send + Sync {
    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>>;
    async fn insert(&self, table: &str, row: Value) -> Result<Value>;
    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> Result<Vec<Value>>;
    /// Calls a stored procedure and returns its raw result.
    async fn rpc(&self, function: &str, args: Value) -> Result<Value>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns the provider's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn database_url(&self) -> &str;
    fn database_api_key(&self) -> &str;
    fn payment_api_base(&self) -> &str;
    fn payment_secret_key(&self) -> &str;
    fn checkout_success_url(&self) -> &str;
    fn checkout_cancel_url(&self) -> &str;
    fn currency(&self) -> &str;
    fn email_api_base(&self) -> &str;
    fn email_api_key(&self) -> &str;
    fn email_sender(&self) -> &str;
}
