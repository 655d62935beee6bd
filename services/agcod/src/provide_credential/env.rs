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

use crate::{constants::*, Credential};
use agcod_core::{Context, ProvideCredential, Result};
use async_trait::async_trait;

/// EnvCredentialProvider loads AGCOD credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AWS_GIFT_CARD_KEY`: The partner access key
/// - `AWS_GIFT_CARD_SECRET`: The partner secret key
/// - `AWS_GIFT_CARD_PARTNER_ID`: The partner id
///
/// All three must be present and non-empty.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let var = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        match (
            var(AWS_GIFT_CARD_KEY),
            var(AWS_GIFT_CARD_SECRET),
            var(AWS_GIFT_CARD_PARTNER_ID),
        ) {
            (Some(ak), Some(sk), Some(partner_id)) => {
                Ok(Some(Credential::new(ak, sk, partner_id)))
            }
            _ => Ok(None),
        }
    }
}
