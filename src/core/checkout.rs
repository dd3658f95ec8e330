use crate::core::cart::plan_checkout;
use crate::core::records;
use crate::domain::model::{
    Amount, BookingStatus, CartItem, CheckoutPlan, CheckoutSessionRequest, ContactInfo,
    NewBooking, ServiceGroup, SessionLineItem,
};
use crate::domain::ports::{Database, PaymentGateway};
use crate::utils::error::{AppError, Result};
use crate::utils::time::paris_now;
use crate::utils::validation::{normalize_phone, validate_email, validate_non_empty_string, validate_phone};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub client_id: Option<String>,
    pub customer: ContactInfo,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOutcome {
    pub checkout_url: String,
    pub session_id: String,
    pub total: Amount,
    pub booking_count: usize,
    pub booking_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

pub struct CheckoutService {
    database: Arc<dyn Database>,
    payments: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
    clock: fn() -> NaiveDateTime,
}

pub fn validate_contact(contact: &ContactInfo) -> Result<()> {
    validate_non_empty_string("customer.first_name", &contact.first_name)?;
    validate_non_empty_string("customer.last_name", &contact.last_name)?;
    validate_email("customer.email", &contact.email)?;
    validate_phone("customer.phone", &contact.phone)?;
    Ok(())
}

impl CheckoutService {
    pub fn new(
        database: Arc<dyn Database>,
        payments: Arc<dyn PaymentGateway>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            database,
            payments,
            settings,
            clock: paris_now,
        }
    }

    /// Overrides the clock used for the past-slot check. Slots are French
    /// wall-clock times, so the default is [`paris_now`] whatever the host zone.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Validation and splitting only, no remote call.
    pub fn preview(&self, request: &CheckoutRequest) -> Result<CheckoutPlan> {
        validate_contact(&request.customer)?;
        plan_checkout(&request.items, (self.clock)())
    }

    pub async fn submit(&self, request: CheckoutRequest) -> Result<CheckoutOutcome> {
        let plan = self.preview(&request)?;

        tracing::info!(
            "🛒 Checkout for {}: {} items, {} bookings, total {}",
            request.customer.email,
            request.items.len(),
            plan.booking_count,
            plan.total
        );

        // 一次付款涵蓋整個購物車
        let session_request = self.session_request(&request, &plan);
        let session = self
            .payments
            .create_checkout_session(&session_request)
            .await?;
        tracing::debug!("Created payment session {}", session.id);

        let mut booking_ids = Vec::with_capacity(plan.booking_count);
        for group in &plan.groups {
            let booking = self.booking_for(&request, group, &session.id)?;
            let row = records::insert_row(self.database.as_ref(), "bookings", &booking).await?;
            let id = records::row_id(&row)?;
            tracing::debug!("Inserted booking {} ({})", id, group.group.as_str());
            booking_ids.push(id);
        }

        tracing::info!("✅ Checkout created {} bookings", booking_ids.len());

        Ok(CheckoutOutcome {
            checkout_url: session.url,
            session_id: session.id,
            total: plan.total,
            booking_count: plan.booking_count,
            booking_ids,
        })
    }

    fn session_request(&self, request: &CheckoutRequest, plan: &CheckoutPlan) -> CheckoutSessionRequest {
        let line_items = plan
            .groups
            .iter()
            .flat_map(|group| group.items.iter())
            .map(|item| SessionLineItem {
                name: item.service_name.clone(),
                description: Some(format!(
                    "{} {}-{}",
                    item.time_slot.date.format("%d/%m/%Y"),
                    item.time_slot.start_time.format("%H:%M"),
                    item.time_slot.end_time.format("%H:%M")
                )),
                unit_amount: item.unit_price,
                // plan_checkout already rejected quantities outside 1..=u32::MAX
                quantity: u32::try_from(item.quantity).unwrap_or(1),
            })
            .collect();

        let mut metadata = BTreeMap::new();
        metadata.insert("booking_count".to_string(), plan.booking_count.to_string());
        metadata.insert("total_cents".to_string(), plan.total.cents().to_string());
        if let Some(client_id) = &request.client_id {
            metadata.insert("client_id".to_string(), client_id.clone());
        }

        CheckoutSessionRequest {
            customer_email: request.customer.email.trim().to_string(),
            currency: self.settings.currency.clone(),
            line_items,
            success_url: self.settings.success_url.clone(),
            cancel_url: self.settings.cancel_url.clone(),
            metadata,
        }
    }

    fn booking_for(
        &self,
        request: &CheckoutRequest,
        group: &ServiceGroup,
        session_id: &str,
    ) -> Result<NewBooking> {
        let first = group.items.first().ok_or_else(|| AppError::ProcessingError {
            message: format!("empty service group {}", group.group.as_str()),
        })?;
        let slot = group.first_slot().unwrap_or(&first.time_slot);

        Ok(NewBooking {
            client_id: request.client_id.clone(),
            client_email: request.customer.email.trim().to_string(),
            client_name: request.customer.full_name(),
            client_phone: normalize_phone(&request.customer.phone),
            service_category: first.category,
            compatibility_group: group.group,
            items: group.items.clone(),
            booking_date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            address: group.items.iter().find_map(|item| item.address.clone()),
            total_price: group.subtotal,
            status: BookingStatus::PendingPayment,
            payment_session_id: session_id.to_string(),
        })
    }
}
