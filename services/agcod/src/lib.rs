//! Client for the Amazon Incentives gift card API (AGCOD).
//!
//! AGCOD requests are signed with a variant of AWS signature v4 that uses the
//! `AGCODService` service name and a fixed set of signed headers. This crate
//! builds and signs those requests, sends them through the [`HttpSend`] of an
//! [`agcod_core::Context`] and maps the replies onto typed responses or a
//! structured [`Error`].
//!
//! ## Example
//!
//! ```no_run
//! use agcod::{Client, Config};
//! use agcod_core::{Context, OsEnv};
//! use agcod_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> agcod::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let config = Config::new()
//!     .with_endpoint("agcod-v2-gamma.amazon.com")
//!     .with_currency("USD");
//!
//! let client = Client::new(ctx, config)?;
//! let funds = client.get_available_funds().await?;
//! println!("{} {}", funds.amount(), funds.currency());
//!
//! let card = client.buy_gift_card(10.0, None).await?;
//! client
//!     .cancel_gift_card(card.creation_request_id(), card.id())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`HttpSend`]: agcod_core::HttpSend

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

pub mod region;

mod operation;
pub use operation::ServiceOperation;

pub mod sign_request;
pub use sign_request::{RequestSigner, SigningKey, SigningTime};

pub mod payload;

mod response;
pub use response::{BalanceResponse, CancelResponse, CreateResponse, Status};

mod error;
pub use error::{Error, ErrorKind, Result};

mod request_log;
pub use request_log::RequestLog;

mod client;
pub use client::Client;
#[cfg(feature = "default-context")]
pub use client::default_context;
