//! In-memory fakes of the ports, shared by the core unit tests.

use crate::domain::model::{CheckoutSession, CheckoutSessionRequest, OutgoingEmail};
use crate::domain::ports::{Database, Filter, FilterOp, Mailer, PaymentGateway, Storage};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| {
        let actual = row.get(&filter.column).map(cell).unwrap_or_default();
        match filter.op {
            FilterOp::Eq => actual == filter.value,
            FilterOp::Gte => actual.as_str() >= filter.value.as_str(),
            FilterOp::Lt => actual.as_str() < filter.value.as_str(),
        }
    })
}

#[derive(Clone, Default)]
pub struct FakeDatabase {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    journal: Arc<Mutex<Vec<String>>>,
    rpc_results: Arc<Mutex<HashMap<String, Value>>>,
    next_id: Arc<Mutex<u64>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, table: &str, row: Value) {
        let mut tables = self.tables.lock().await;
        tables.entry(table.to_string()).or_default().push(row);
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        let tables = self.tables.lock().await;
        tables.get(table).cloned().unwrap_or_default()
    }

    /// Operations in call order, e.g. `update:providers`, `insert:admin_actions_log`.
    pub async fn journal(&self) -> Vec<String> {
        self.journal.lock().await.clone()
    }

    pub async fn set_rpc_result(&self, function: &str, result: Value) {
        let mut results = self.rpc_results.lock().await;
        results.insert(function.to_string(), result);
    }

    async fn record(&self, entry: String) {
        self.journal.lock().await.push(entry);
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>> {
        self.record(format!("select:{}", table)).await;
        let tables = self.tables.lock().await;
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| matches(row, filters)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<Value> {
        self.record(format!("insert:{}", table)).await;
        let id = {
            let mut next_id = self.next_id.lock().await;
            *next_id += 1;
            format!("{}-{}", table, *next_id)
        };
        if let Value::Object(map) = &mut row {
            map.entry("id").or_insert(Value::String(id));
        }
        let mut tables = self.tables.lock().await;
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> Result<Vec<Value>> {
        self.record(format!("update:{}", table)).await;
        let mut tables = self.tables.lock().await;
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches(row, filters)) {
                if let (Value::Object(target), Value::Object(changes)) = (&mut *row, &patch) {
                    for (key, value) in changes {
                        target.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value> {
        self.record(format!("rpc:{}", function)).await;
        let results = self.rpc_results.lock().await;
        Ok(results
            .get(function)
            .cloned()
            .unwrap_or_else(|| json!({ "function": function, "args": args })))
    }
}

#[derive(Clone, Default)]
pub struct FakePayments {
    sessions: Arc<Mutex<Vec<CheckoutSessionRequest>>>,
    fail: bool,
}

impl FakePayments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sessions(&self) -> Vec<CheckoutSessionRequest> {
        self.sessions.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for FakePayments {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        if self.fail {
            return Err(AppError::UpstreamError {
                service: "payment".to_string(),
                status: 502,
                body: "gateway down".to_string(),
            });
        }
        let mut sessions = self.sessions.lock().await;
        sessions.push(request.clone());
        let id = format!("cs_test_{}", sessions.len());
        Ok(CheckoutSession {
            url: format!("https://checkout.test/pay/{}", id),
            id,
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let mut sent = self.sent.lock().await;
        sent.push(email.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}
