use std::fmt::{Debug, Formatter};

use agcod_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use agcod_core::time::{format_date, format_iso8601, now, DateTime};
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::HeaderValue;
use log::debug;
use serde_json::json;

use crate::constants::*;
use crate::region::region_for;
use crate::{Credential, RequestLog, ServiceOperation};

/// The instant a request is signed, in both forms the signature needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningTime {
    timestamp: String,
    date: String,
}

impl SigningTime {
    /// Take both forms from the same instant.
    pub fn new(time: DateTime) -> Self {
        Self {
            timestamp: format_iso8601(time),
            date: format_date(time),
        }
    }

    /// Signing time for now.
    pub fn now() -> Self {
        Self::new(now())
    }

    /// `YYYYMMDDTHHMMSSZ`, sent as `x-amz-date`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// `YYYYMMDD`, used in the credential scope.
    pub fn date(&self) -> &str {
        &self.date
    }
}

/// The signing key together with the intermediate keys it was derived from.
#[derive(Clone)]
pub struct SigningKey {
    date_key: Vec<u8>,
    region_key: Vec<u8>,
    service_key: Vec<u8>,
    signing_key: Vec<u8>,
}

impl SigningKey {
    /// Raw signing key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.signing_key
    }

    /// Hex encoded signing key.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.signing_key)
    }

    fn stages_hex(&self) -> serde_json::Value {
        json!({
            "date": hex::encode(&self.date_key),
            "region": hex::encode(&self.region_key),
            "service": hex::encode(&self.service_key),
        })
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

/// Derive the signing key for `date` (`YYYYMMDD`) and `region`.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, "AGCODService")
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn derive_signing_key(secret: &str, date: &str, region: &str) -> SigningKey {
    let secret = format!("{KEY_QUALIFIER}{secret}");
    let date_key = hmac_sha256(secret.as_bytes(), date.as_bytes());
    let region_key = hmac_sha256(&date_key, region.as_bytes());
    let service_key = hmac_sha256(&region_key, SERVICE_NAME.as_bytes());
    let signing_key = hmac_sha256(&service_key, TERMINATION_STRING.as_bytes());

    SigningKey {
        date_key,
        region_key,
        service_key,
        signing_key,
    }
}

/// Scope: `20220610/<region>/AGCODService/aws4_request`
pub fn scope(date: &str, region: &str) -> String {
    format!("{date}/{region}/{SERVICE_NAME}/{TERMINATION_STRING}")
}

/// The four signed header lines, without a trailing newline.
pub fn canonical_headers(
    operation: ServiceOperation,
    endpoint: &str,
    time: &SigningTime,
) -> String {
    format!(
        "accept:{ACCEPT_JSON}\nhost:{endpoint}\n{X_AMZ_DATE}:{}\n{X_AMZ_TARGET}:{}",
        time.timestamp(),
        operation.target()
    )
}

/// CanonicalRequest:
///
/// ```text
/// POST
/// /<operation>
///
/// <canonical headers>
///
/// accept;host;x-amz-date;x-amz-target
/// <hex sha256 of payload>
/// ```
///
/// The third line is the empty query string.
pub fn canonical_request(
    operation: ServiceOperation,
    endpoint: &str,
    time: &SigningTime,
    payload: &str,
) -> String {
    format!(
        "POST\n/{operation}\n\n{}\n\n{SIGNED_HEADERS}\n{}",
        canonical_headers(operation, endpoint, time),
        hex_sha256(payload.as_bytes())
    )
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220610T085450Z
/// 20220610/<region>/AGCODService/aws4_request
/// <hashed canonical request>
/// ```
pub fn string_to_sign(time: &SigningTime, region: &str, hashed_canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{}\n{}\n{hashed_canonical_request}",
        time.timestamp(),
        scope(time.date(), region)
    )
}

/// Hex signature of `string_to_sign`.
pub fn signature(key: &SigningKey, string_to_sign: &str) -> String {
    hex_hmac_sha256(key.as_bytes(), string_to_sign.as_bytes())
}

/// Value of the `Authorization` header.
pub fn authorization(access_key: &str, scope: &str, signature: &str) -> String {
    format!(
        "{ALGORITHM} Credential={access_key}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}"
    )
}

/// RequestSigner builds signed AGCOD requests for one endpoint.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    endpoint: String,
    region: &'static str,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a signer for an endpoint host, the region comes from the
    /// endpoint table.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            region: region_for(endpoint),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Endpoint host requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Region requests are signed for.
    pub fn region(&self) -> &str {
        self.region
    }

    /// `https://<endpoint>/<operation>`
    pub fn url(&self, operation: ServiceOperation) -> String {
        format!("https://{}/{operation}", self.endpoint)
    }

    /// Build the signed POST carrying `payload` for `operation`.
    pub fn sign(
        &self,
        cred: &Credential,
        operation: ServiceOperation,
        payload: &str,
        log: &mut RequestLog,
    ) -> agcod_core::Result<http::Request<Bytes>> {
        let time = SigningTime::new(self.time.unwrap_or_else(now));

        let creq = canonical_request(operation, &self.endpoint, &time, payload);
        log.write(
            "canonical_request",
            json!({
                "operation": operation.as_str(),
                "payload": payload,
                "canonical_request": creq,
                "timestamp": time.timestamp(),
            }),
        );

        let scope = scope(time.date(), self.region);
        debug!("calculated scope: {scope}");
        let string_to_sign = string_to_sign(&time, self.region, &hex_sha256(creq.as_bytes()));
        debug!("calculated string to sign: {string_to_sign}");

        let key = derive_signing_key(&cred.secret_key, time.date(), self.region);
        if log.is_enabled() {
            log.write("derived_key", key.stages_hex());
        }
        let signature = signature(&key, &string_to_sign);

        let mut authorization =
            HeaderValue::from_str(&authorization(&cred.access_key, &scope, &signature))?;
        authorization.set_sensitive(true);

        let mut req = http::Request::builder()
            .method(http::Method::POST)
            .uri(self.url(operation))
            .body(Bytes::from(payload.to_string()))?;

        let headers = req.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(ACCEPT_JSON));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(payload.len()));
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(X_AMZ_DATE, HeaderValue::from_str(time.timestamp())?);
        headers.insert(X_AMZ_TARGET, HeaderValue::from_str(&operation.target())?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        Ok(req)
    }
}
