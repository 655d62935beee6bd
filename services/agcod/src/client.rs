use std::sync::{Arc, Mutex};

use agcod_core::time::DateTime;
use agcod_core::{Context, ProvideCredential, SigningCredential};
use log::{debug, warn};
use serde_json::{json, Value};

use crate::payload::{
    to_payload, CancelGiftCardRequest, CreateGiftCardRequest, GetAvailableFundsRequest,
};
use crate::{
    BalanceResponse, CancelResponse, Config, CreateResponse, Credential,
    DefaultCredentialProvider, Error, RequestLog, RequestSigner, Result, ServiceOperation,
};

/// Client calls the AGCOD operations with signed requests.
///
/// The client is cheap to clone and safe to share. Every call builds its own
/// signing time, signature and [`RequestLog`]; the only state shared between
/// calls is the cached credential.
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    config: Arc<Config>,
    signer: RequestSigner,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    credential: Arc<Mutex<Option<Credential>>>,
}

impl Client {
    /// Create a client from `config`, filling unset fields from the env of
    /// `ctx`.
    ///
    /// Fails if no valid endpoint is configured.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let config = config.from_env(&ctx);
        let Some(endpoint) = config.endpoint_host() else {
            return Err(Error::config_invalid(format!(
                "a valid endpoint is required, got {:?}",
                config.endpoint
            )));
        };

        let config = Arc::new(config);
        let signer = RequestSigner::new(&endpoint);
        debug!(
            "agcod client for {} signing in region {}",
            signer.endpoint(),
            signer.region()
        );

        Ok(Self {
            ctx,
            provider: Arc::new(DefaultCredentialProvider::new(config.clone())),
            config,
            signer,
            credential: Arc::new(Mutex::new(None)),
        })
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.provider = Arc::new(provider);
        self.credential = Arc::new(Mutex::new(None));
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.signer = self.signer.with_time(time);
        self
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Endpoint host requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.signer.endpoint()
    }

    /// Region requests are signed for.
    pub fn region(&self) -> &str {
        self.signer.region()
    }

    /// Buy a gift card of `amount` in the configured currency.
    ///
    /// Without a `creation_request_id` one is generated. Repeating a call with
    /// the same id returns the same card instead of buying a new one.
    pub async fn buy_gift_card(
        &self,
        amount: f64,
        creation_request_id: Option<&str>,
    ) -> Result<CreateResponse> {
        let mut log = RequestLog::new(self.config.is_debug());
        log.write("call", json!("buy_gift_card"));

        let result = match self.config.currency.as_deref() {
            Some(currency) => {
                self.call(ServiceOperation::CreateGiftCard, &mut log, |cred| {
                    let body = CreateGiftCardRequest::new(
                        &cred.partner_id,
                        currency,
                        amount,
                        creation_request_id,
                    )?;
                    to_payload(&body)
                })
                .await
            }
            None => Err(Error::config_invalid(
                "a currency is required to buy a gift card",
            )),
        };

        result
            .and_then(CreateResponse::from_json)
            .map(|resp| resp.with_log(&log))
            .map_err(|err| err.with_log(&log))
    }

    /// Cancel the card bought with `creation_request_id` that got `gc_id`.
    pub async fn cancel_gift_card(
        &self,
        creation_request_id: &str,
        gc_id: &str,
    ) -> Result<CancelResponse> {
        let mut log = RequestLog::new(self.config.is_debug());
        log.write("call", json!("cancel_gift_card"));

        self.call(ServiceOperation::CancelGiftCard, &mut log, |cred| {
            to_payload(&CancelGiftCardRequest::new(
                &cred.partner_id,
                creation_request_id,
                gc_id,
            ))
        })
        .await
        .and_then(CancelResponse::from_json)
        .map(|resp| resp.with_log(&log))
        .map_err(|err| err.with_log(&log))
    }

    /// Read the funds left on the partner account.
    pub async fn get_available_funds(&self) -> Result<BalanceResponse> {
        let mut log = RequestLog::new(self.config.is_debug());
        log.write("call", json!("get_available_funds"));

        self.call(ServiceOperation::GetAvailableFunds, &mut log, |cred| {
            to_payload(&GetAvailableFundsRequest::new(&cred.partner_id))
        })
        .await
        .and_then(BalanceResponse::from_json)
        .map(|resp| resp.with_log(&log))
        .map_err(|err| err.with_log(&log))
    }

    async fn credential(&self) -> Result<Credential> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if let Some(cred) = cached.filter(|cred| cred.is_valid()) {
            return Ok(cred);
        }

        let cred = self
            .provider
            .provide_credential(&self.ctx)
            .await
            .map_err(Error::credential_failed)?
            .filter(|cred| cred.is_valid())
            .ok_or_else(Error::credential_missing)?;
        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());
        Ok(cred)
    }

    async fn call(
        &self,
        operation: ServiceOperation,
        log: &mut RequestLog,
        payload: impl FnOnce(&Credential) -> Result<String>,
    ) -> Result<Value> {
        let cred = self.credential().await?;
        let payload = payload(&cred)?;

        let url = self.signer.url(operation);
        let req = self
            .signer
            .sign(&cred, operation, &payload, log)
            .map_err(|e| Error::transport_init(&url, e))?;

        debug!("sending {operation} request to {url}");
        let resp = self
            .ctx
            .http_send(req)
            .await
            .map_err(|e| Error::transport(&url, e))?;

        let (parts, body) = resp.into_parts();
        log.write(
            "response",
            json!({
                "status": parts.status.as_u16(),
                "body": String::from_utf8_lossy(&body),
            }),
        );

        if !parts.status.is_success() {
            warn!("{operation} request rejected with status {}", parts.status);
            return Err(Error::rejected(parts.status.as_u16(), &body));
        }

        decode_object(&body)
    }
}

fn decode_object(body: &[u8]) -> Result<Value> {
    let value: Value = serde_json::from_slice(body).map_err(Error::json_decode)?;
    if !value.is_object() {
        return Err(Error::json_not_object());
    }
    Ok(value)
}

#[cfg(feature = "default-context")]
mod reqwest_context {
    use std::time::Duration;

    use agcod_core::{Context, OsEnv};
    use agcod_http_send_reqwest::ReqwestHttpSend;

    use super::Client;
    use crate::{Config, Error, Result};

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a context backed by reqwest and the process environment.
    ///
    /// Connections time out after 10 seconds, whole requests after 60.
    pub fn default_context() -> Result<Context> {
        let http = ReqwestHttpSend::with_timeout(CONNECT_TIMEOUT, REQUEST_TIMEOUT)
            .map_err(|e| Error::config_invalid(e.to_string()))?;
        Ok(Context::new().with_http_send(http).with_env(OsEnv))
    }

    impl Client {
        /// Create a client configured entirely from `AWS_GIFT_CARD_*` env.
        pub fn from_env() -> Result<Self> {
            Self::new(default_context()?, Config::default())
        }
    }
}
#[cfg(feature = "default-context")]
pub use reqwest_context::default_context;
