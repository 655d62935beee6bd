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

use std::fmt::{Debug, Formatter};

use crate::constants::*;
use agcod_core::{utils::Redact, Context};

/// Config carries all the configuration for an AGCOD client.
///
/// Every field is resolved in the order: explicit value, env value, default.
/// Empty strings count as unset.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_GIFT_CARD_KEY`]
    pub access_key: Option<String>,
    /// `secret_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_GIFT_CARD_SECRET`]
    pub secret_key: Option<String>,
    /// `partner_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_GIFT_CARD_PARTNER_ID`]
    pub partner_id: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_GIFT_CARD_ENDPOINT`]
    ///
    /// Both a bare host like `agcod-v2-gamma.amazon.com` and a full url like
    /// `https://agcod-v2-gamma.amazon.com/` are accepted.
    pub endpoint: Option<String>,
    /// `currency` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_GIFT_CARD_CURRENCY`]
    pub currency: Option<String>,
    /// `debug` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_DEBUG`], any value other than empty or `0` enables it
    /// - `false`
    pub debug: Option<bool>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set access_key
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Set secret_key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set partner_id
    pub fn with_partner_id(mut self, partner_id: impl Into<String>) -> Self {
        self.partner_id = Some(partner_id.into());
        self
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set debug
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        merge_env(&mut self.access_key, ctx, AWS_GIFT_CARD_KEY);
        merge_env(&mut self.secret_key, ctx, AWS_GIFT_CARD_SECRET);
        merge_env(&mut self.partner_id, ctx, AWS_GIFT_CARD_PARTNER_ID);
        merge_env(&mut self.endpoint, ctx, AWS_GIFT_CARD_ENDPOINT);
        merge_env(&mut self.currency, ctx, AWS_GIFT_CARD_CURRENCY);
        if let Some(v) = ctx.env_var(AWS_DEBUG) {
            self.debug.get_or_insert(!v.is_empty() && v != "0");
        }

        self
    }

    /// The endpoint host requests are sent to, if an endpoint is configured.
    ///
    /// Returns `None` when the endpoint is unset or isn't a valid host.
    pub fn endpoint_host(&self) -> Option<String> {
        normalize_endpoint(self.endpoint.as_deref()?)
    }

    /// Whether request-scoped debug logs are collected.
    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }
}

fn merge_env(field: &mut Option<String>, ctx: &Context, key: &str) {
    if field.as_deref().is_some_and(str::is_empty) {
        *field = None;
    }
    if let Some(v) = ctx.env_var(key).filter(|v| !v.is_empty()) {
        field.get_or_insert(v);
    }
}

/// Reduce an endpoint value to its lowercase host.
///
/// Requests always go to `https://<host>/`, so an endpoint carrying any port
/// other than 443 is rejected instead of being silently redirected.
fn normalize_endpoint(endpoint: &str) -> Option<String> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return None;
    }

    let uri: http::Uri = endpoint.parse().ok()?;
    if uri.port_u16().is_some_and(|port| port != 443) {
        return None;
    }
    uri.host()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_ascii_lowercase())
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &self.access_key.as_ref().map(Redact::from))
            .field("secret_key", &self.secret_key.as_ref().map(Redact::from))
            .field("partner_id", &self.partner_id)
            .field("endpoint", &self.endpoint)
            .field("currency", &self.currency)
            .field("debug", &self.debug)
            .finish()
    }
}
