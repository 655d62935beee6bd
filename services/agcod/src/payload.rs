use rand::Rng;
use serde::Serialize;

use crate::{Error, Result};

/// Body of a `CreateGiftCard` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGiftCardRequest {
    /// Idempotency key, AGCOD returns the same card for a repeated id.
    pub creation_request_id: String,
    /// Partner placing the order.
    pub partner_id: String,
    /// Face value of the card.
    pub value: MoneyAmount,
}

/// A currency and amount pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyAmount {
    /// ISO 4217 currency, for example `USD`.
    pub currency_code: String,
    /// Amount in that currency.
    pub amount: f64,
}

/// Body of a `CancelGiftCard` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelGiftCardRequest {
    /// Creation request id the card was bought with.
    pub creation_request_id: String,
    /// Partner that bought the card.
    pub partner_id: String,
    /// Gift card id returned by `CreateGiftCard`.
    pub gc_id: String,
}

/// Body of a `GetAvailableFunds` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAvailableFundsRequest {
    /// Partner to query.
    pub partner_id: String,
}

impl CreateGiftCardRequest {
    /// Build a purchase request.
    ///
    /// A missing or empty `creation_request_id` is replaced with a generated
    /// one of the form `<partner_id>_<13 hex chars>`.
    pub fn new(
        partner_id: &str,
        currency: &str,
        amount: f64,
        creation_request_id: Option<&str>,
    ) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "gift card amount must be a positive number, got {amount}"
            )));
        }

        let creation_request_id = match creation_request_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_creation_request_id(partner_id),
        };

        Ok(Self {
            creation_request_id,
            partner_id: partner_id.to_string(),
            value: MoneyAmount {
                currency_code: currency.to_string(),
                amount,
            },
        })
    }
}

impl CancelGiftCardRequest {
    /// Build a cancel request.
    pub fn new(partner_id: &str, creation_request_id: &str, gc_id: &str) -> Self {
        Self {
            creation_request_id: creation_request_id.to_string(),
            partner_id: partner_id.to_string(),
            gc_id: gc_id.to_string(),
        }
    }
}

impl GetAvailableFundsRequest {
    /// Build a balance request.
    pub fn new(partner_id: &str) -> Self {
        Self {
            partner_id: partner_id.to_string(),
        }
    }
}

/// Serialize a request body the way it is signed and sent.
pub fn to_payload(body: &impl Serialize) -> Result<String> {
    serde_json::to_string(body).map_err(Error::json_encode)
}

/// Generate `<partner_id>_<suffix>`, see [`unique_suffix`].
pub fn generate_creation_request_id(partner_id: &str) -> String {
    format!("{partner_id}_{}", unique_suffix())
}

/// A 13 character lowercase hex id: 8 chars of unix seconds followed by 5
/// random chars.
///
/// Ids generated within the same second only differ in the random part.
pub(crate) fn unique_suffix() -> String {
    let secs = wrap_seconds(agcod_core::time::now().timestamp());
    let random: u32 = rand::thread_rng().gen_range(0..0x10_0000);
    format!("{secs:08x}{random:05x}")
}

/// Unix seconds folded into 32 bits, wrapping past 2106.
fn wrap_seconds(timestamp: i64) -> u32 {
    u32::try_from(timestamp.rem_euclid(1 << 32)).unwrap_or_default()
}
