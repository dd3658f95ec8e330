use crate::adapters::http::{build_client, ensure_success, join_url};
use crate::domain::model::{CheckoutSession, CheckoutSessionRequest};
use crate::domain::ports::PaymentGateway;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Hosted checkout through the Stripe Checkout Sessions API.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(api_base: &str, secret_key: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_base: api_base.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Stripe expects nested form keys, e.g. `line_items[0][price_data][unit_amount]`.
    pub fn form_fields(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
        let mut fields = vec![
            ("mode".to_string(), "payment".to_string()),
            ("customer_email".to_string(), request.customer_email.clone()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", i);
            fields.push((
                format!("{}[price_data][currency]", prefix),
                request.currency.clone(),
            ));
            fields.push((
                format!("{}[price_data][product_data][name]", prefix),
                item.name.clone(),
            ));
            if let Some(description) = &item.description {
                fields.push((
                    format!("{}[price_data][product_data][description]", prefix),
                    description.clone(),
                ));
            }
            fields.push((
                format!("{}[price_data][unit_amount]", prefix),
                item.unit_amount.cents().to_string(),
            ));
            fields.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
        }

        for (key, value) in &request.metadata {
            fields.push((format!("metadata[{}]", key), value.clone()));
        }

        fields
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        tracing::debug!(
            "Creating checkout session with {} line items",
            request.line_items.len()
        );
        let response = self
            .client
            .post(join_url(&self.api_base, "v1/checkout/sessions"))
            .bearer_auth(&self.secret_key)
            .form(&Self::form_fields(request))
            .send()
            .await?;
        let session = ensure_success("payment", response).await?.json().await?;
        Ok(session)
    }
}
