//! JSON entry point shared by the Lambda handler and the local invoker.

use crate::core::admin::{
    AdminService, AnalyzeBinomeRequest, DissolveBinomeRequest, ExportTransactionsRequest,
    MarkInvoicePaidRequest, RejectProviderRequest, SendNotificationRequest,
    ValidateProviderRequest,
};
use crate::core::checkout::{CheckoutRequest, CheckoutService, CheckoutSettings};
use crate::core::forms::{DocumentUploadRequest, FormService};
use crate::domain::model::{JobApplication, Review};
use crate::domain::ports::{ConfigProvider, Database, Mailer, PaymentGateway, Storage};
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum FunctionRequest {
    CreateCheckout(CheckoutRequest),
    ValidateProvider(ValidateProviderRequest),
    RejectProvider(RejectProviderRequest),
    SendNotification(SendNotificationRequest),
    MarkInvoicePaid(MarkInvoicePaidRequest),
    DissolveBinome(DissolveBinomeRequest),
    AnalyzeBinome(AnalyzeBinomeRequest),
    ExportTransactions(ExportTransactionsRequest),
    SubmitJobApplication(JobApplication),
    UploadApplicationDocument(DocumentUploadRequest),
    SubmitReview(Review),
}

impl FunctionRequest {
    pub fn action(&self) -> &'static str {
        match self {
            FunctionRequest::CreateCheckout(_) => "create_checkout",
            FunctionRequest::ValidateProvider(_) => "validate_provider",
            FunctionRequest::RejectProvider(_) => "reject_provider",
            FunctionRequest::SendNotification(_) => "send_notification",
            FunctionRequest::MarkInvoicePaid(_) => "mark_invoice_paid",
            FunctionRequest::DissolveBinome(_) => "dissolve_binome",
            FunctionRequest::AnalyzeBinome(_) => "analyze_binome",
            FunctionRequest::ExportTransactions(_) => "export_transactions",
            FunctionRequest::SubmitJobApplication(_) => "submit_job_application",
            FunctionRequest::UploadApplicationDocument(_) => "upload_application_document",
            FunctionRequest::SubmitReview(_) => "submit_review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FunctionResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Collaborators a function invocation needs.
#[derive(Clone)]
pub struct Backends {
    pub database: Arc<dyn Database>,
    pub payments: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn Storage>,
}

pub struct Functions {
    checkout: CheckoutService,
    admin: AdminService,
    forms: FormService,
}

impl Functions {
    pub fn new(backends: Backends, settings: CheckoutSettings) -> Self {
        Self {
            checkout: CheckoutService::new(
                backends.database.clone(),
                backends.payments.clone(),
                settings,
            ),
            admin: AdminService::new(
                backends.database.clone(),
                backends.mailer.clone(),
                backends.storage.clone(),
            ),
            forms: FormService::new(backends.database, backends.storage),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, backends: Backends) -> Self {
        Self::new(
            backends,
            CheckoutSettings {
                currency: config.currency().to_string(),
                success_url: config.checkout_success_url().to_string(),
                cancel_url: config.checkout_cancel_url().to_string(),
            },
        )
    }

    pub fn checkout(&self) -> &CheckoutService {
        &self.checkout
    }

    async fn run(&self, request: FunctionRequest) -> Result<Value> {
        let data = match request {
            FunctionRequest::CreateCheckout(r) => serde_json::to_value(self.checkout.submit(r).await?)?,
            FunctionRequest::ValidateProvider(r) => serde_json::to_value(self.admin.validate_provider(r).await?)?,
            FunctionRequest::RejectProvider(r) => serde_json::to_value(self.admin.reject_provider(r).await?)?,
            FunctionRequest::SendNotification(r) => serde_json::to_value(self.admin.send_notification(r).await?)?,
            FunctionRequest::MarkInvoicePaid(r) => serde_json::to_value(self.admin.mark_invoice_paid(r).await?)?,
            FunctionRequest::DissolveBinome(r) => self.admin.dissolve_binome(r).await?,
            FunctionRequest::AnalyzeBinome(r) => self.admin.analyze_binome(r).await?,
            FunctionRequest::ExportTransactions(r) => serde_json::to_value(self.admin.export_transactions(r).await?)?,
            FunctionRequest::SubmitJobApplication(r) => serde_json::to_value(self.forms.submit_job_application(r).await?)?,
            FunctionRequest::UploadApplicationDocument(r) => {
                serde_json::to_value(self.forms.upload_application_document(r).await?)?
            }
            FunctionRequest::SubmitReview(r) => serde_json::to_value(self.forms.submit_review(r).await?)?,
        };
        Ok(data)
    }

    pub async fn handle(&self, request: FunctionRequest) -> FunctionResponse {
        let action = request.action();
        tracing::info!("▶️ {}", action);

        match self.run(request).await {
            Ok(data) => {
                tracing::info!("✅ {} succeeded", action);
                FunctionResponse::ok(data)
            }
            Err(e) => {
                log_failure(action, &e);
                FunctionResponse::failed(e.user_friendly_message())
            }
        }
    }

    pub async fn handle_json(&self, payload: Value) -> FunctionResponse {
        match serde_json::from_value::<FunctionRequest>(payload) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!("❌ Rejected malformed request: {}", e);
                FunctionResponse::failed("Invalid request")
            }
        }
    }
}

fn log_failure(action: &str, error: &AppError) {
    match error.severity() {
        crate::utils::error::ErrorSeverity::Low => {
            tracing::warn!("❌ {} rejected: {}", action, error)
        }
        _ => {
            tracing::error!(
                "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
                action,
                error,
                error.category(),
                error.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
        }
    }
}
