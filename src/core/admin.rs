//! Admin back-office actions.
//!
//! Every action follows the same sequence: read, write, audit, respond. The
//! calls are issued one after the other and nothing is rolled back when a later
//! step fails; the admin retries from the dashboard.

use crate::core::records::{decode, fetch_by_id, insert_row};
use crate::domain::model::{
    Amount, AuditLogEntry, FinancialTransaction, Invoice, InvoiceStatus, Notification,
    OutgoingEmail, Provider, ProviderStatus,
};
use crate::domain::ports::{Database, Filter, Mailer, Storage};
use crate::utils::error::{AppError, Result};
use crate::utils::html::escape_html;
use crate::utils::validation::{validate_email, validate_max_length, validate_non_empty_string};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

const AUDIT_TABLE: &str = "admin_actions_log";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidateProviderRequest {
    pub admin_id: String,
    pub provider_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RejectProviderRequest {
    pub admin_id: String,
    pub provider_id: String,
    pub reason: String,
}

fn default_notification_kind() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendNotificationRequest {
    pub admin_id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(default = "default_notification_kind")]
    pub kind: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkInvoicePaidRequest {
    pub admin_id: String,
    pub invoice_id: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DissolveBinomeRequest {
    pub admin_id: String,
    pub binome_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzeBinomeRequest {
    pub binome_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExportTransactionsRequest {
    pub admin_id: String,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderDecision {
    pub provider_id: String,
    pub status: ProviderStatus,
    pub email_sent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationSent {
    pub notification_id: Value,
    pub email_sent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePaid {
    pub invoice_id: String,
    pub amount: Amount,
    pub transactions_updated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionsExport {
    pub path: String,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    booking_id: &'a str,
    created_at: String,
    client_price: String,
    provider_payment: String,
    company_commission: String,
    client_payment_status: &'a str,
}

pub struct AdminService {
    database: Arc<dyn Database>,
    mailer: Arc<dyn Mailer>,
    storage: Arc<dyn Storage>,
}

impl AdminService {
    pub fn new(
        database: Arc<dyn Database>,
        mailer: Arc<dyn Mailer>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            database,
            mailer,
            storage,
        }
    }

    async fn audit(&self, entry: AuditLogEntry) -> Result<()> {
        tracing::info!(
            "📝 {} {} {} by {}",
            entry.action_type,
            entry.entity_type,
            entry.entity_id,
            entry.admin_user_id
        );
        insert_row(self.database.as_ref(), AUDIT_TABLE, &entry).await?;
        Ok(())
    }

    async fn load_provider(&self, provider_id: &str) -> Result<(Provider, Value)> {
        let row = fetch_by_id(self.database.as_ref(), "providers", "Provider", provider_id).await?;
        Ok((decode(&row)?, row))
    }

    /// Sends to `to` when present. A missing address is not an error: the
    /// in-app notification still reaches the user.
    async fn send_optional_email(&self, to: Option<&str>, subject: &str, html: String) -> Result<bool> {
        let Some(to) = to else {
            tracing::warn!("No email address for '{}', skipping email", subject);
            return Ok(false);
        };
        let message_id = self
            .mailer
            .send(&OutgoingEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                html,
            })
            .await?;
        tracing::debug!("Email '{}' sent as {}", subject, message_id);
        Ok(true)
    }

    pub async fn validate_provider(&self, request: ValidateProviderRequest) -> Result<ProviderDecision> {
        let (provider, old_row) = self.load_provider(&request.provider_id).await?;
        let patch = json!({ "status": ProviderStatus::Active, "is_verified": true });

        self.database
            .update("providers", &[Filter::eq("id", &provider.id)], patch.clone())
            .await?;

        if let Some(user_id) = &provider.user_id {
            let notification = Notification {
                user_id: user_id.clone(),
                title: "Profil validé".to_string(),
                message: "Votre profil prestataire a été validé. Vous pouvez recevoir des missions."
                    .to_string(),
                kind: "provider_validated".to_string(),
            };
            insert_row(self.database.as_ref(), "notifications", &notification).await?;
        }

        let email_sent = self
            .send_optional_email(
                provider.email.as_deref(),
                "Bienvenue chez Bikawo",
                format!(
                    "<p>Bonjour {},</p><p>Votre profil a été validé par notre équipe. Bienvenue parmi les prestataires Bikawo !</p>",
                    escape_html(provider.display_name())
                ),
            )
            .await?;

        self.audit(AuditLogEntry {
            admin_user_id: request.admin_id,
            action_type: "validate_provider".to_string(),
            entity_type: "provider".to_string(),
            entity_id: provider.id.clone(),
            old_data: Some(old_row),
            new_data: Some(patch),
            description: format!("Provider {} validated", provider.display_name()),
        })
        .await?;

        Ok(ProviderDecision {
            provider_id: provider.id,
            status: ProviderStatus::Active,
            email_sent,
        })
    }

    pub async fn reject_provider(&self, request: RejectProviderRequest) -> Result<ProviderDecision> {
        validate_non_empty_string("reason", &request.reason)?;
        validate_max_length("reason", &request.reason, 1000)?;

        let (provider, old_row) = self.load_provider(&request.provider_id).await?;
        let patch = json!({
            "status": ProviderStatus::Rejected,
            "is_verified": false,
            "rejection_reason": request.reason.trim(),
        });

        self.database
            .update("providers", &[Filter::eq("id", &provider.id)], patch.clone())
            .await?;

        let email_sent = self
            .send_optional_email(
                provider.email.as_deref(),
                "Votre candidature Bikawo",
                format!(
                    "<p>Bonjour {},</p><p>Votre profil n'a pas pu être validé pour la raison suivante :</p><p>{}</p>",
                    escape_html(provider.display_name()),
                    escape_html(request.reason.trim())
                ),
            )
            .await?;

        self.audit(AuditLogEntry {
            admin_user_id: request.admin_id,
            action_type: "reject_provider".to_string(),
            entity_type: "provider".to_string(),
            entity_id: provider.id.clone(),
            old_data: Some(old_row),
            new_data: Some(patch),
            description: format!("Provider {} rejected", provider.display_name()),
        })
        .await?;

        Ok(ProviderDecision {
            provider_id: provider.id,
            status: ProviderStatus::Rejected,
            email_sent,
        })
    }

    pub async fn send_notification(&self, request: SendNotificationRequest) -> Result<NotificationSent> {
        validate_non_empty_string("user_id", &request.user_id)?;
        validate_non_empty_string("title", &request.title)?;
        validate_max_length("title", &request.title, 200)?;
        validate_non_empty_string("message", &request.message)?;
        if let Some(email) = &request.email {
            validate_email("email", email)?;
        }

        let notification = Notification {
            user_id: request.user_id.clone(),
            title: request.title.trim().to_string(),
            message: request.message.trim().to_string(),
            kind: request.kind.clone(),
        };
        let row = insert_row(self.database.as_ref(), "notifications", &notification).await?;

        let email_sent = match &request.email {
            Some(email) => {
                self.send_optional_email(
                    Some(email.trim()),
                    &notification.title,
                    format!("<p>{}</p>", escape_html(&notification.message)),
                )
                .await?
            }
            None => false,
        };

        self.audit(AuditLogEntry {
            admin_user_id: request.admin_id,
            action_type: "send_notification".to_string(),
            entity_type: "user".to_string(),
            entity_id: request.user_id,
            old_data: None,
            new_data: Some(serde_json::to_value(&notification)?),
            description: format!("Notification '{}' sent", notification.title),
        })
        .await?;

        Ok(NotificationSent {
            notification_id: row.get("id").cloned().unwrap_or(Value::Null),
            email_sent,
        })
    }

    pub async fn mark_invoice_paid(&self, request: MarkInvoicePaidRequest) -> Result<InvoicePaid> {
        let row = fetch_by_id(
            self.database.as_ref(),
            "invoices",
            "Invoice",
            &request.invoice_id,
        )
        .await?;
        let invoice: Invoice = decode(&row)?;

        match invoice.status {
            InvoiceStatus::Pending => {}
            InvoiceStatus::Paid => {
                return Err(AppError::validation("invoice_id", "This invoice is already paid"));
            }
            InvoiceStatus::Cancelled => {
                return Err(AppError::validation(
                    "invoice_id",
                    "A cancelled invoice cannot be marked as paid",
                ));
            }
        }

        let patch = json!({
            "status": InvoiceStatus::Paid,
            "paid_at": Utc::now(),
            "payment_method": request.payment_method.as_deref().unwrap_or("manual"),
        });
        self.database
            .update("invoices", &[Filter::eq("id", &invoice.id)], patch.clone())
            .await?;

        // 同步財務紀錄的付款狀態
        let transactions_updated = match &invoice.booking_id {
            Some(booking_id) => self
                .database
                .update(
                    "financial_transactions",
                    &[Filter::eq("booking_id", booking_id)],
                    json!({ "client_payment_status": "paid" }),
                )
                .await?
                .len(),
            None => 0,
        };

        self.audit(AuditLogEntry {
            admin_user_id: request.admin_id,
            action_type: "mark_invoice_paid".to_string(),
            entity_type: "invoice".to_string(),
            entity_id: invoice.id.clone(),
            old_data: Some(row),
            new_data: Some(patch),
            description: format!("Invoice {} marked as paid ({})", invoice.id, invoice.amount),
        })
        .await?;

        Ok(InvoicePaid {
            invoice_id: invoice.id,
            amount: invoice.amount,
            transactions_updated,
        })
    }

    /// The pairing logic itself lives in the `dissolve_binome` stored procedure.
    pub async fn dissolve_binome(&self, request: DissolveBinomeRequest) -> Result<Value> {
        validate_non_empty_string("reason", &request.reason)?;

        let result = self
            .database
            .rpc(
                "dissolve_binome",
                json!({
                    "p_binome_id": request.binome_id,
                    "p_reason": request.reason.trim(),
                    "p_admin_id": request.admin_id,
                }),
            )
            .await?;

        self.audit(AuditLogEntry {
            admin_user_id: request.admin_id,
            action_type: "dissolve_binome".to_string(),
            entity_type: "binome".to_string(),
            entity_id: request.binome_id.clone(),
            old_data: None,
            new_data: Some(json!({ "reason": request.reason.trim() })),
            description: format!("Binome {} dissolved", request.binome_id),
        })
        .await?;

        Ok(result)
    }

    pub async fn analyze_binome(&self, request: AnalyzeBinomeRequest) -> Result<Value> {
        validate_non_empty_string("binome_id", &request.binome_id)?;
        self.database
            .rpc(
                "analyze_binome_performance",
                json!({ "p_binome_id": request.binome_id }),
            )
            .await
    }

    pub async fn export_transactions(&self, request: ExportTransactionsRequest) -> Result<TransactionsExport> {
        if let (Some(from), Some(to)) = (request.from, request.to) {
            if from > to {
                return Err(AppError::validation("from", "Start date must be before end date"));
            }
        }

        let mut filters = Vec::new();
        if let Some(from) = request.from {
            filters.push(Filter::gte("created_at", from.to_string()));
        }
        // `to` is inclusive: everything before the next midnight
        if let Some(next_day) = request.to.and_then(|to| to.succ_opt()) {
            filters.push(Filter::lt("created_at", next_day.to_string()));
        }

        let rows = self.database.select("financial_transactions", &filters).await?;
        let transactions = rows
            .iter()
            .map(decode::<FinancialTransaction>)
            .collect::<Result<Vec<_>>>()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for transaction in &transactions {
            writer.serialize(ExportRow {
                id: &transaction.id,
                booking_id: transaction.booking_id.as_deref().unwrap_or(""),
                created_at: transaction.created_at.to_rfc3339(),
                client_price: transaction.client_price.to_string(),
                provider_payment: transaction.provider_payment.to_string(),
                company_commission: transaction.company_commission.to_string(),
                client_payment_status: &transaction.client_payment_status,
            })?;
        }
        let data = writer.into_inner().map_err(|e| AppError::ProcessingError {
            message: format!("Failed to finish CSV export: {}", e),
        })?;

        let range = |date: Option<NaiveDate>| date.map(|d| d.to_string()).unwrap_or_else(|| "all".to_string());
        let path = format!(
            "exports/financial-transactions_{}_{}_{}.csv",
            range(request.from),
            range(request.to),
            Utc::now().format("%Y%m%d%H%M%S")
        );
        self.storage.write_file(&path, &data).await?;

        self.audit(AuditLogEntry {
            admin_user_id: request.admin_id,
            action_type: "export_transactions".to_string(),
            entity_type: "financial_transactions".to_string(),
            entity_id: path.clone(),
            old_data: None,
            new_data: Some(json!({ "rows": transactions.len() })),
            description: format!("Exported {} financial transactions", transactions.len()),
        })
        .await?;

        Ok(TransactionsExport {
            path,
            rows: transactions.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FakeDatabase, FakeMailer, MemoryStorage};

    struct Fixture {
        db: FakeDatabase,
        mailer: FakeMailer,
        storage: MemoryStorage,
        admin: AdminService,
    }

    fn fixture() -> Fixture {
        let db = FakeDatabase::new();
        let mailer = FakeMailer::new();
        let storage = MemoryStorage::new();
        let admin = AdminService::new(
            Arc::new(db.clone()),
            Arc::new(mailer.clone()),
            Arc::new(storage.clone()),
        );
        Fixture {
            db,
            mailer,
            storage,
            admin,
        }
    }

    async fn seed_provider(db: &FakeDatabase) {
        db.seed(
            "providers",
            json!({
                "id": "prov-1",
                "user_id": "user-9",
                "business_name": "Nadia Services",
                "email": "nadia@example.fr",
                "status": "pending",
                "is_verified": false
            }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_validate_provider_updates_notifies_and_audits() {
        let f = fixture();
        seed_provider(&f.db).await;

        let decision = f
            .admin
            .validate_provider(ValidateProviderRequest {
                admin_id: "admin-1".to_string(),
                provider_id: "prov-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(decision.status, ProviderStatus::Active);
        assert!(decision.email_sent);

        let providers = f.db.rows("providers").await;
        assert_eq!(providers[0]["status"], "active");
        assert_eq!(providers[0]["is_verified"], true);
        assert_eq!(f.db.rows("notifications").await.len(), 1);
        assert_eq!(f.mailer.sent().await[0].to, "nadia@example.fr");

        let journal = f.db.journal().await;
        assert_eq!(
            journal,
            vec![
                "select:providers",
                "update:providers",
                "insert:notifications",
                "insert:admin_actions_log"
            ]
        );
        let audit = f.db.rows(AUDIT_TABLE).await;
        assert_eq!(audit[0]["action_type"], "validate_provider");
        assert_eq!(audit[0]["old_data"]["status"], "pending");
    }

    #[tokio::test]
    async fn test_provider_name_is_escaped_in_email() {
        let f = fixture();
        f.db.seed(
            "providers",
            json!({
                "id": "prov-2",
                "user_id": null,
                "business_name": "<img src=x onerror=alert(1)>",
                "email": "mallory@example.fr",
                "status": "pending"
            }),
        )
        .await;

        f.admin
            .validate_provider(ValidateProviderRequest {
                admin_id: "admin-1".to_string(),
                provider_id: "prov-2".to_string(),
            })
            .await
            .unwrap();

        let html = f.mailer.sent().await[0].html.clone();
        assert!(!html.contains("<img"));
        assert!(html.contains("Bonjour &lt;img src=x onerror=alert(1)&gt;,"));
    }

    #[tokio::test]
    async fn test_validate_missing_provider_is_not_found() {
        let f = fixture();

        let err = f
            .admin
            .validate_provider(ValidateProviderRequest {
                admin_id: "admin-1".to_string(),
                provider_id: "ghost".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(f.db.rows(AUDIT_TABLE).await.is_empty());
    }

    #[tokio::test]
    async fn test_reject_provider_requires_reason() {
        let f = fixture();
        seed_provider(&f.db).await;

        let err = f
            .admin
            .reject_provider(RejectProviderRequest {
                admin_id: "admin-1".to_string(),
                provider_id: "prov-1".to_string(),
                reason: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError { .. }));

        let decision = f
            .admin
            .reject_provider(RejectProviderRequest {
                admin_id: "admin-1".to_string(),
                provider_id: "prov-1".to_string(),
                reason: "Pièce d'identité illisible".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(decision.status, ProviderStatus::Rejected);
        assert_eq!(
            f.db.rows("providers").await[0]["rejection_reason"],
            "Pièce d'identité illisible"
        );
        assert!(f.mailer.sent().await[0].html.contains("illisible"));
    }

    #[tokio::test]
    async fn test_send_notification_without_email() {
        let f = fixture();

        let sent = f
            .admin
            .send_notification(SendNotificationRequest {
                admin_id: "admin-1".to_string(),
                user_id: "user-3".to_string(),
                title: "Rappel".to_string(),
                message: "Votre prestation a lieu demain".to_string(),
                kind: "reminder".to_string(),
                email: None,
            })
            .await
            .unwrap();

        assert!(!sent.email_sent);
        assert!(f.mailer.sent().await.is_empty());
        assert_eq!(f.db.rows("notifications").await[0]["type"], "reminder");
        assert_eq!(f.db.rows(AUDIT_TABLE).await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_notification_rejects_bad_email() {
        let f = fixture();

        let result = f
            .admin
            .send_notification(SendNotificationRequest {
                admin_id: "admin-1".to_string(),
                user_id: "user-3".to_string(),
                title: "Rappel".to_string(),
                message: "Demain".to_string(),
                kind: "info".to_string(),
                email: Some("not-an-email".to_string()),
            })
            .await;

        assert!(result.is_err());
        assert!(f.db.journal().await.is_empty());
    }

    #[tokio::test]
    async fn test_mark_invoice_paid_updates_transactions() {
        let f = fixture();
        f.db.seed(
            "invoices",
            json!({"id": "inv-1", "booking_id": "book-1", "client_id": "c-1", "amount": 5000, "status": "pending"}),
        )
        .await;
        f.db.seed(
            "financial_transactions",
            json!({"id": "ft-1", "booking_id": "book-1", "client_price": 5000, "provider_payment": 3500,
                   "company_commission": 1500, "client_payment_status": "pending",
                   "created_at": "2025-03-01T10:00:00Z"}),
        )
        .await;

        let paid = f
            .admin
            .mark_invoice_paid(MarkInvoicePaidRequest {
                admin_id: "admin-1".to_string(),
                invoice_id: "inv-1".to_string(),
                payment_method: Some("virement".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(paid.amount, Amount::from_cents(5000));
        assert_eq!(paid.transactions_updated, 1);
        assert_eq!(f.db.rows("invoices").await[0]["status"], "paid");
        assert_eq!(f.db.rows("invoices").await[0]["payment_method"], "virement");
        assert_eq!(
            f.db.rows("financial_transactions").await[0]["client_payment_status"],
            "paid"
        );
        assert_eq!(f.db.journal().await.last().unwrap(), "insert:admin_actions_log");
    }

    #[tokio::test]
    async fn test_mark_invoice_paid_twice_is_rejected() {
        let f = fixture();
        f.db.seed(
            "invoices",
            json!({"id": "inv-2", "booking_id": null, "client_id": null, "amount": 1200, "status": "paid"}),
        )
        .await;

        let err = f
            .admin
            .mark_invoice_paid(MarkInvoicePaidRequest {
                admin_id: "admin-1".to_string(),
                invoice_id: "inv-2".to_string(),
                payment_method: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_friendly_message(), "This invoice is already paid");
    }

    #[tokio::test]
    async fn test_mark_cancelled_invoice_paid_is_rejected() {
        let f = fixture();
        f.db.seed(
            "invoices",
            json!({"id": "inv-3", "booking_id": null, "client_id": null, "amount": 900, "status": "cancelled"}),
        )
        .await;

        let err = f
            .admin
            .mark_invoice_paid(MarkInvoicePaidRequest {
                admin_id: "admin-1".to_string(),
                invoice_id: "inv-3".to_string(),
                payment_method: None,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.user_friendly_message(),
            "A cancelled invoice cannot be marked as paid"
        );
        assert_eq!(f.db.rows("invoices").await[0]["status"], "cancelled");
        assert!(f.db.rows(AUDIT_TABLE).await.is_empty());
    }

    #[tokio::test]
    async fn test_dissolve_binome_calls_procedure_then_audits() {
        let f = fixture();
        f.db.set_rpc_result("dissolve_binome", json!({"dissolved": true})).await;

        let result = f
            .admin
            .dissolve_binome(DissolveBinomeRequest {
                admin_id: "admin-1".to_string(),
                binome_id: "bin-7".to_string(),
                reason: "Déménagement du client".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result, json!({"dissolved": true}));
        assert_eq!(
            f.db.journal().await,
            vec!["rpc:dissolve_binome", "insert:admin_actions_log"]
        );
    }

    #[tokio::test]
    async fn test_analyze_binome_is_read_only() {
        let f = fixture();
        f.db.set_rpc_result("analyze_binome_performance", json!({"score": 87})).await;

        let result = f
            .admin
            .analyze_binome(AnalyzeBinomeRequest {
                binome_id: "bin-7".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result["score"], 87);
        assert!(f.db.rows(AUDIT_TABLE).await.is_empty());
    }

    #[tokio::test]
    async fn test_export_transactions_writes_csv() {
        let f = fixture();
        for (id, day) in [("ft-1", "01"), ("ft-2", "15"), ("ft-3", "28")] {
            f.db.seed(
                "financial_transactions",
                json!({"id": id, "booking_id": format!("book-{}", id), "client_price": 4000,
                       "provider_payment": 2800, "company_commission": 1200,
                       "client_payment_status": "paid",
                       "created_at": format!("2025-03-{}T09:00:00Z", day)}),
            )
            .await;
        }

        let export = f
            .admin
            .export_transactions(ExportTransactionsRequest {
                admin_id: "admin-1".to_string(),
                from: NaiveDate::from_ymd_opt(2025, 3, 10),
                to: NaiveDate::from_ymd_opt(2025, 3, 31),
            })
            .await
            .unwrap();

        assert_eq!(export.rows, 2);
        assert!(export.path.starts_with("exports/financial-transactions_2025-03-10_2025-03-31_"));

        let csv = String::from_utf8(f.storage.get_file(&export.path).await.unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "id,booking_id,created_at,client_price,provider_payment,company_commission,client_payment_status"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("ft-2,book-ft-2,"));
        assert!(lines[1].ends_with(",40.00,28.00,12.00,paid"));
    }

    #[tokio::test]
    async fn test_export_includes_the_whole_last_day() {
        let f = fixture();
        for (id, created_at) in [
            ("ft-1", "2025-03-31T23:59:59.500Z"),
            ("ft-2", "2025-04-01T00:00:00Z"),
        ] {
            f.db.seed(
                "financial_transactions",
                json!({"id": id, "booking_id": null, "client_price": 1000,
                       "provider_payment": 700, "company_commission": 300,
                       "client_payment_status": "paid", "created_at": created_at}),
            )
            .await;
        }

        let export = f
            .admin
            .export_transactions(ExportTransactionsRequest {
                admin_id: "admin-1".to_string(),
                from: None,
                to: NaiveDate::from_ymd_opt(2025, 3, 31),
            })
            .await
            .unwrap();

        assert_eq!(export.rows, 1);
        let csv = String::from_utf8(f.storage.get_file(&export.path).await.unwrap()).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("ft-1,"));
    }

    #[tokio::test]
    async fn test_export_rejects_inverted_range() {
        let f = fixture();

        let result = f
            .admin
            .export_transactions(ExportTransactionsRequest {
                admin_id: "admin-1".to_string(),
                from: NaiveDate::from_ymd_opt(2025, 4, 1),
                to: NaiveDate::from_ymd_opt(2025, 3, 1),
            })
            .await;

        assert!(result.is_err());
    }
}
