//! Reqwest-based HTTP sending implementation for agcod.
//!
//! This crate provides `ReqwestHttpSend`, an HTTP client that implements the
//! `HttpSend` trait from `agcod_core` using reqwest.
//!
//! Transport failures are mapped onto [`agcod_core::ErrorKind`]:
//!
//! - connect failures, DNS failures and timeouts become `ConnectionFailed`
//! - certificate verification failures become `CertificateInvalid`
//! - requests reqwest refuses to build become `RequestInvalid`
//! - everything else becomes `Unexpected`
//!
//! ## Example
//!
//! ```no_run
//! use agcod_core::{Context, OsEnv};
//! use agcod_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> agcod_core::Result<()> {
//! let http = ReqwestHttpSend::with_timeout(Duration::from_secs(5), Duration::from_secs(30))?;
//! let ctx = Context::new().with_http_send(http).with_env(OsEnv);
//! # Ok(())
//! # }
//! ```

use agcod_core::{Error, HttpSend, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::{Client, Request};
use std::time::Duration;

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new ReqwestHttpSend with connect and total request timeouts.
    pub fn with_timeout(connect: Duration, total: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect)
            .timeout(total)
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let uri = req.uri().to_string();
        let req = Request::try_from(req).map_err(|e| classify(&uri, e))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| classify(&uri, e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| classify(&uri, e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

fn classify(uri: &str, err: reqwest::Error) -> Error {
    log::debug!("http request to {uri} failed: {err:?}");

    let message = error_chain_message(&err);
    let error = if err.is_builder() {
        Error::request_invalid(format!("failed to build request for {uri}: {message}"))
    } else if is_certificate_error(&err) {
        Error::certificate_invalid(message)
    } else if err.is_connect() || err.is_timeout() {
        Error::connection_failed(message)
    } else {
        Error::unexpected(message)
    };
    error.with_source(err)
}

fn error_chain_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut cur = err.source();
    while let Some(e) = cur {
        message.push_str(": ");
        message.push_str(&e.to_string());
        cur = e.source();
    }
    message
}

fn is_certificate_error(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut cur: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = cur {
        if e.to_string().to_lowercase().contains("certificate") {
            return true;
        }
        cur = e.source();
    }
    false
}
