use crate::domain::payment::{CheckoutSession, CheckoutSessionRequest};
use crate::domain::ports::PaymentProvider;
use crate::error::{Result, ShiftError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
const CHECKOUT_SESSIONS_PATH: &str = "/v1/checkout/sessions";

/// Creates Checkout Sessions through Stripe's form-encoded REST API.
#[derive(Clone)]
pub struct StripePaymentProvider {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl StripePaymentProvider {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{CHECKOUT_SESSIONS_PATH}", self.api_base)
    }
}

/// Encodes a session request in Stripe's bracket notation.
pub fn form_fields(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let item = &request.line_item;
    let mut fields = vec![
        ("mode".to_string(), "payment".to_string()),
        ("customer_email".to_string(), request.customer_email.clone()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        (
            "line_items[0][price_data][currency]".to_string(),
            item.currency.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            item.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            item.name.clone(),
        ),
        ("line_items[0][quantity]".to_string(), item.quantity.to_string()),
    ];
    fields.extend(
        request
            .metadata
            .iter()
            .map(|(key, value)| (format!("metadata[{key}]"), value.clone())),
    );
    fields
}

#[async_trait]
impl PaymentProvider for StripePaymentProvider {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.secret_key)
            .form(&form_fields(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| format!("provider responded with {status}"));
            warn!(%status, %message, "checkout session rejected");
            return Err(ShiftError::ProviderRequestFailed(message));
        }

        let session: SessionResponse = serde_json::from_str(&body).map_err(|e| {
            ShiftError::ProviderRequestFailed(format!("unreadable session response: {e}"))
        })?;
        debug!(session_id = %session.id, "checkout session created");

        let url = session.url.ok_or_else(|| {
            ShiftError::ProviderRequestFailed(format!("session {} has no url", session.id))
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}

/// Stand-in used when no provider secret is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPaymentProvider;

#[async_trait]
impl PaymentProvider for DisabledPaymentProvider {
    async fn create_checkout_session(
        &self,
        _request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        Err(ShiftError::ProviderRequestFailed(
            "payment provider is not configured".to_string(),
        ))
    }
}
