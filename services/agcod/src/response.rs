//! Typed views over AGCOD success responses.
//!
//! Each response keeps the raw JSON it was built from and the debug entries
//! of the request that produced it.

use std::fmt::{Display, Formatter};

use agcod_core::time::{parse_iso8601, DateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Error, RequestLog, Result};

/// Outcome status reported by AGCOD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The call succeeded.
    Success,
    /// The call failed and must not be retried as is.
    Failure,
    /// The call may be retried with the same creation request id.
    Resend,
    /// Status missing or not recognised.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Status {
    /// Wire form, for example `SUCCESS`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::Resend => "RESEND",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value {
            "SUCCESS" => Status::Success,
            "FAILURE" => Status::Failure,
            "RESEND" => Status::Resend,
            _ => Status::Unknown,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGiftCardBody {
    gc_id: Option<String>,
    creation_request_id: Option<String>,
    gc_claim_code: Option<String>,
    card_info: CardInfoBody,
    gc_expiration_date: Option<String>,
    status: Option<Status>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardInfoBody {
    value: MoneyBody,
    card_status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyBody {
    #[serde(default, deserialize_with = "lenient_amount")]
    amount: f64,
    currency_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelGiftCardBody {
    gc_id: Option<String>,
    creation_request_id: Option<String>,
    status: Option<Status>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetAvailableFundsBody {
    available_funds: Value,
    status: Option<Status>,
    timestamp: Option<String>,
}

/// Amounts arrive as numbers, but numeric strings are accepted too.
/// Anything else reads as zero.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(amount_of(&Value::deserialize(deserializer)?))
}

fn amount_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

/// Result of a `CreateGiftCard` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResponse {
    id: String,
    creation_request_id: String,
    claim_code: String,
    value: f64,
    currency: String,
    expiration_date: String,
    card_status: String,
    status: Status,
    raw: Value,
    log: Vec<Value>,
}

impl CreateResponse {
    /// Build from a decoded response body. `cardInfo.value` is required.
    pub fn from_json(raw: Value) -> Result<Self> {
        let body: CreateGiftCardBody =
            serde_json::from_value(raw.clone()).map_err(Error::json_decode)?;

        Ok(Self {
            id: body.gc_id.unwrap_or_default(),
            creation_request_id: body.creation_request_id.unwrap_or_default(),
            claim_code: body.gc_claim_code.unwrap_or_default(),
            value: body.card_info.value.amount,
            currency: body.card_info.value.currency_code.unwrap_or_default(),
            expiration_date: body.gc_expiration_date.unwrap_or_default(),
            card_status: body.card_info.card_status.unwrap_or_default(),
            status: body.status.unwrap_or_default(),
            raw,
            log: Vec::new(),
        })
    }

    pub(crate) fn with_log(mut self, log: &RequestLog) -> Self {
        self.log = log.entries().to_vec();
        self
    }

    /// Gift card id (`gcId`), needed to cancel the card.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation request id the card was bought with.
    pub fn creation_request_id(&self) -> &str {
        &self.creation_request_id
    }

    /// Code the recipient redeems.
    pub fn claim_code(&self) -> &str {
        &self.claim_code
    }

    /// Face value of the card.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Currency of [`Self::value`].
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Expiration date as sent by AGCOD, empty when the card doesn't expire.
    pub fn expiration_date(&self) -> &str {
        &self.expiration_date
    }

    /// Card status, for example `Fulfilled`.
    pub fn card_status(&self) -> &str {
        &self.card_status
    }

    /// Call status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The decoded response body.
    pub fn raw_json(&self) -> &Value {
        &self.raw
    }

    /// Debug entries of the request, empty unless debug is enabled.
    pub fn log(&self) -> &[Value] {
        &self.log
    }
}

/// Result of a `CancelGiftCard` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelResponse {
    id: String,
    creation_request_id: String,
    status: Status,
    raw: Value,
    log: Vec<Value>,
}

impl CancelResponse {
    /// Build from a decoded response body.
    pub fn from_json(raw: Value) -> Result<Self> {
        let body: CancelGiftCardBody =
            serde_json::from_value(raw.clone()).map_err(Error::json_decode)?;

        Ok(Self {
            id: body.gc_id.unwrap_or_default(),
            creation_request_id: body.creation_request_id.unwrap_or_default(),
            status: body.status.unwrap_or_default(),
            raw,
            log: Vec::new(),
        })
    }

    pub(crate) fn with_log(mut self, log: &RequestLog) -> Self {
        self.log = log.entries().to_vec();
        self
    }

    /// Id of the cancelled card.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation request id of the cancelled card.
    pub fn creation_request_id(&self) -> &str {
        &self.creation_request_id
    }

    /// Call status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The decoded response body.
    pub fn raw_json(&self) -> &Value {
        &self.raw
    }

    /// Debug entries of the request, empty unless debug is enabled.
    pub fn log(&self) -> &[Value] {
        &self.log
    }
}

/// Result of a `GetAvailableFunds` call.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceResponse {
    amount: f64,
    currency: String,
    status: Status,
    timestamp: String,
    raw: Value,
    log: Vec<Value>,
}

impl BalanceResponse {
    /// Build from a decoded response body. `availableFunds` is required.
    pub fn from_json(raw: Value) -> Result<Self> {
        let body: GetAvailableFundsBody =
            serde_json::from_value(raw.clone()).map_err(Error::json_decode)?;

        let amount = body
            .available_funds
            .get("amount")
            .map(amount_of)
            .unwrap_or_default();
        let currency = body
            .available_funds
            .get("currencyCode")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            amount,
            currency,
            status: body.status.unwrap_or_default(),
            timestamp: body.timestamp.unwrap_or_default(),
            raw,
            log: Vec::new(),
        })
    }

    pub(crate) fn with_log(mut self, log: &RequestLog) -> Self {
        self.log = log.entries().to_vec();
        self
    }

    /// Funds left on the partner account.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Currency of [`Self::amount`].
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Call status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Time the balance was read, as sent by AGCOD.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// [`Self::timestamp`] parsed, `None` if it isn't `YYYYMMDDTHHMMSSZ`.
    pub fn timestamp_utc(&self) -> Option<DateTime> {
        parse_iso8601(&self.timestamp).ok()
    }

    /// The decoded response body.
    pub fn raw_json(&self) -> &Value {
        &self.raw
    }

    /// Debug entries of the request, empty unless debug is enabled.
    pub fn log(&self) -> &[Value] {
        &self.log
    }
}
