use crate::error::{Result, ShiftError};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PRODUCT_NAME: &str = "Parcel Payment";
pub const PARCEL_ID_METADATA: &str = "parcelId";
pub const SUCCESS_PATH: &str = "/dashboard/payment-success";
pub const CANCEL_PATH: &str = "/dashboard/payment-canceled";

/// A positive price in the currency's major unit (e.g. dollars).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(ShiftError::InvalidBody("cost must be positive".to_string()))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Amount in the currency's minor unit, truncating fractions of a cent.
    pub fn to_minor_units(&self) -> Result<i64> {
        self.0
            .checked_mul(dec!(100))
            .and_then(|minor| minor.trunc().to_i64())
            .ok_or_else(|| ShiftError::InvalidBody("cost is out of range".to_string()))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = ShiftError;

    fn try_from(value: Decimal) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Body of `POST /create-checkout-session`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cost: Decimal,
    pub sender_email: String,
    pub parcel_id: String,
}

impl CheckoutRequest {
    pub fn from_json(body: Value) -> Result<Self> {
        let request: Self = serde_json::from_value(body)
            .map_err(|e| ShiftError::InvalidBody(e.to_string()))?;

        if request.sender_email.trim().is_empty() {
            return Err(ShiftError::InvalidBody(
                "senderEmail must not be empty".to_string(),
            ));
        }
        if request.parcel_id.trim().is_empty() {
            return Err(ShiftError::InvalidBody(
                "parcelId must not be empty".to_string(),
            ));
        }

        Ok(request)
    }
}

/// Deployment-level values every checkout session shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Base URL of the client application the provider redirects back to.
    pub client_url: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub currency: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Provider-agnostic description of a single-item payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub line_item: LineItem,
    pub customer_email: String,
    pub metadata: Vec<(String, String)>,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSessionRequest {
    pub fn build(request: CheckoutRequest, settings: &CheckoutSettings) -> Result<Self> {
        let price = Price::new(request.cost)?;
        let base = settings.client_url.trim_end_matches('/');

        Ok(Self {
            line_item: LineItem {
                name: PRODUCT_NAME.to_string(),
                currency: settings.currency.clone(),
                unit_amount: price.to_minor_units()?,
                quantity: 1,
            },
            customer_email: request.sender_email,
            metadata: vec![(PARCEL_ID_METADATA.to_string(), request.parcel_id)],
            success_url: format!("{base}{SUCCESS_PATH}"),
            cancel_url: format!("{base}{CANCEL_PATH}"),
        })
    }
}

/// Session created by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}
