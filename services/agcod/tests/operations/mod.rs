// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agcod::{
    Client, Config, Credential, ErrorKind, StaticCredentialProvider, Status,
};
use agcod_core::time::DateTime;
use agcod_core::{Context, ProvideCredential, Result as CoreResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use http::StatusCode;
use pretty_assertions::assert_eq;

use crate::mock::{FailingHttpSend, MockAgcod, ACCESS_KEY, ENDPOINT, PARTNER_ID, SECRET_KEY};

fn test_time() -> DateTime {
    Utc.with_ymd_and_hms(2022, 6, 10, 8, 54, 50).unwrap()
}

fn test_config() -> Config {
    Config::new().with_endpoint(ENDPOINT).with_currency("USD")
}

fn test_client(mock: &MockAgcod, config: Config) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(mock.clone());
    Client::new(ctx, config)
        .expect("client must build")
        .with_credential_provider(StaticCredentialProvider::new(
            ACCESS_KEY, SECRET_KEY, PARTNER_ID,
        ))
        .with_time(test_time())
}

#[derive(Debug, Default)]
struct CountingProvider(Arc<AtomicUsize>);

#[async_trait]
impl ProvideCredential for CountingProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> CoreResult<Option<Self::Credential>> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Credential::new(ACCESS_KEY, SECRET_KEY, PARTNER_ID)))
    }
}

#[tokio::test]
async fn test_get_available_funds() -> Result<()> {
    let mock = MockAgcod::new(1000.0);
    let client = test_client(&mock, test_config());

    let funds = client.get_available_funds().await?;
    assert_eq!(funds.amount(), 1000.0);
    assert_eq!(funds.currency(), "USD");
    assert_eq!(funds.status(), Status::Success);
    assert_eq!(funds.timestamp_utc(), Some(test_time()));
    assert!(funds.log().is_empty());

    let req = mock.last_request().expect("request must be recorded");
    assert_eq!(req.path, "/GetAvailableFunds");
    assert_eq!(req.body.as_ref(), br#"{"partnerId":"Test"}"#);
    Ok(())
}

#[tokio::test]
async fn test_buy_gift_card_is_idempotent() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config());

    let first = client.buy_gift_card(25.0, Some("Test_retry0001")).await?;
    let second = client.buy_gift_card(25.0, Some("Test_retry0001")).await?;

    assert_eq!(first.id(), second.id());
    assert_eq!(first.claim_code(), second.claim_code());
    assert_eq!(first.raw_json(), second.raw_json());
    assert_eq!(first.value(), 25.0);
    assert_eq!(first.currency(), "USD");
    assert_eq!(mock.balance(), 75.0);
    Ok(())
}

#[tokio::test]
async fn test_buy_gift_card_generates_creation_request_id() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config());

    let first = client.buy_gift_card(10.0, None).await?;
    let second = client.buy_gift_card(10.0, None).await?;

    assert!(first.creation_request_id().starts_with("Test_"));
    assert_eq!(first.creation_request_id().len(), "Test_".len() + 13);
    assert_ne!(first.creation_request_id(), second.creation_request_id());
    assert_ne!(first.id(), second.id());
    assert_eq!(mock.balance(), 80.0);
    Ok(())
}

#[tokio::test]
async fn test_cancel_gift_card() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config());

    let card = client.buy_gift_card(10.0, None).await?;
    let cancelled = client
        .cancel_gift_card(card.creation_request_id(), card.id())
        .await?;

    assert_eq!(cancelled.status(), Status::Success);
    assert_eq!(cancelled.id(), card.id());
    assert_eq!(cancelled.creation_request_id(), card.creation_request_id());
    assert_eq!(mock.cancelled(), vec![card.id().to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_cancel_unknown_card_is_rejected() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config());

    let err = client
        .cancel_gift_card("Test_unknown", "GC9999")
        .await
        .expect_err("unknown card must be rejected");
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.code(), "F100");
    assert_eq!(err.error_type(), "InvalidRequestInput");
    Ok(())
}

#[tokio::test]
async fn test_insufficient_funds() -> Result<()> {
    let mock = MockAgcod::new(5.0);
    let client = test_client(&mock, test_config());

    let err = client
        .buy_gift_card(10.0, None)
        .await
        .expect_err("purchase over balance must fail");
    assert_eq!(err.status(), Status::Failure);
    assert_eq!(err.code(), "F300");
    assert_eq!(err.error_type(), "InsufficientFunds");
    assert_eq!(err.message(), "Insufficient Funds");
    assert_eq!(err.http_status(), Some(400));
    assert!(!err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn test_rate_exceeded_is_retryable() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config());
    mock.respond_next(StatusCode::BAD_REQUEST, r#"{"message":"Rate exceeded"}"#);

    let err = client
        .buy_gift_card(10.0, Some("Test_throttled"))
        .await
        .expect_err("throttled call must fail");
    assert_eq!(err.kind(), ErrorKind::RateExceeded);
    assert_eq!(err.status(), Status::Resend);
    assert_eq!(err.code(), "T001");
    assert!(err.is_retryable());

    // Resending with the same id goes through.
    let card = client.buy_gift_card(10.0, Some("Test_throttled")).await?;
    assert_eq!(card.creation_request_id(), "Test_throttled");
    assert_eq!(mock.balance(), 90.0);
    Ok(())
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config()).with_credential_provider(
        StaticCredentialProvider::new(ACCESS_KEY, "not-the-secret", PARTNER_ID),
    );

    let err = client
        .get_available_funds()
        .await
        .expect_err("bad signature must be rejected");
    assert_eq!(err.http_status(), Some(403));
    assert_eq!(err.code(), "E999");
    assert_eq!(err.error_type(), "OtherUnknownError");
    assert!(err.message().contains("signature"));
    Ok(())
}

#[tokio::test]
async fn test_transport_failure() -> Result<()> {
    let ctx = Context::new().with_http_send(FailingHttpSend(agcod_core::ErrorKind::ConnectionFailed));
    let client = Client::new(ctx, test_config())?
        .with_credential_provider(StaticCredentialProvider::new(ACCESS_KEY, SECRET_KEY, PARTNER_ID));

    let err = client
        .get_available_funds()
        .await
        .expect_err("transport must fail");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.code(), "C002");
    assert_eq!(err.status(), Status::Failure);
    assert_eq!(
        err.message(),
        "Could not connect to AWS (https://agcod-v2-gamma.amazon.com/GetAvailableFunds). Please check your internet connection and try again. [mock transport failure]"
    );
    assert_eq!(err.transport_code(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_credential() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let ctx = Context::new().with_http_send(mock.clone());
    let client = Client::new(ctx, test_config())?;

    let err = client
        .get_available_funds()
        .await
        .expect_err("no credential is configured");
    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    assert_eq!(err.code(), "A001");
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_currency() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, Config::new().with_endpoint(ENDPOINT));

    let err = client
        .buy_gift_card(10.0, None)
        .await
        .expect_err("no currency is configured");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(mock.request_count(), 0);

    // Operations that don't need a currency still work.
    client.get_available_funds().await?;
    Ok(())
}

#[tokio::test]
async fn test_undecodable_success_body() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config());

    mock.respond_next(StatusCode::OK, "[1, 2, 3]");
    let err = client.get_available_funds().await.expect_err("array body");
    assert_eq!(err.kind(), ErrorKind::JsonDecode);
    assert_eq!(err.code(), "J-0");

    mock.respond_next(StatusCode::OK, "not json at all");
    let err = client.get_available_funds().await.expect_err("garbage body");
    assert_eq!(err.code(), "J-4");

    mock.respond_next(StatusCode::OK, r#"{"status":"SUCCESS"}"#);
    let err = client.get_available_funds().await.expect_err("missing funds");
    assert_eq!(err.code(), "J-0");
    Ok(())
}

#[tokio::test]
async fn test_debug_log_is_attached() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config().with_debug(true));

    let funds = client.get_available_funds().await?;
    let keys: Vec<&str> = funds
        .log()
        .iter()
        .filter_map(|entry| entry.as_object()?.keys().next().map(String::as_str))
        .collect();
    assert_eq!(
        keys,
        vec!["call", "canonical_request", "derived_key", "response"]
    );

    mock.respond_next(StatusCode::BAD_REQUEST, r#"{"message":"Rate exceeded"}"#);
    let err = client.get_available_funds().await.expect_err("throttled");
    let payload = err.to_json();
    assert_eq!(payload["log_id"].as_str().map(str::len), Some(13));
    assert_eq!(payload["log"].as_array().map(Vec::len), Some(4));
    assert_eq!(payload["log"][3]["response"]["status"], 400);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_keep_logs_apart() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let client = test_client(&mock, test_config().with_debug(true));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get_available_funds().await })
        })
        .collect();

    for task in tasks {
        let funds = task.await??;
        assert_eq!(funds.log().len(), 4);
    }
    assert_eq!(mock.request_count(), 8);
    Ok(())
}

#[tokio::test]
async fn test_credential_is_cached() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let calls = Arc::new(AtomicUsize::new(0));
    let client = test_client(&mock, test_config())
        .with_credential_provider(CountingProvider(calls.clone()));

    client.get_available_funds().await?;
    client.buy_gift_card(1.0, None).await?;
    client.clone().get_available_funds().await?;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_credential_merged_from_config() -> Result<()> {
    let mock = MockAgcod::new(100.0);
    let ctx = Context::new().with_http_send(mock.clone());
    let config = test_config()
        .with_access_key(ACCESS_KEY)
        .with_secret_key(SECRET_KEY)
        .with_partner_id(PARTNER_ID);

    let client = Client::new(ctx, config)?;
    let funds = client.get_available_funds().await?;
    assert_eq!(funds.amount(), 100.0);
    Ok(())
}

#[cfg(feature = "default-context")]
#[test]
fn test_client_from_env() {
    temp_env::with_vars(
        [
            ("AWS_GIFT_CARD_KEY", Some(ACCESS_KEY)),
            ("AWS_GIFT_CARD_SECRET", Some(SECRET_KEY)),
            ("AWS_GIFT_CARD_PARTNER_ID", Some(PARTNER_ID)),
            ("AWS_GIFT_CARD_ENDPOINT", Some("https://agcod-v2-fe-gamma.amazon.com")),
            ("AWS_GIFT_CARD_CURRENCY", Some("JPY")),
            ("AWS_DEBUG", None),
        ],
        || {
            let client = Client::from_env().expect("client must build from env");
            assert_eq!(client.endpoint(), "agcod-v2-fe-gamma.amazon.com");
            assert_eq!(client.region(), "us-west-2");
            assert_eq!(client.config().currency.as_deref(), Some("JPY"));
            assert!(!client.config().is_debug());
        },
    );
}
