use std::sync::Arc;

use crate::{Config, Credential};
use agcod_core::{Context, ProvideCredential, Result};
use async_trait::async_trait;

/// ConfigCredentialProvider loads the credential from a [`Config`].
///
/// Each field is merged on its own, so an explicit access key can be paired
/// with a secret taken from the environment.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new ConfigCredentialProvider.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.as_ref().clone().from_env(ctx);

        match (config.access_key, config.secret_key, config.partner_id) {
            (Some(ak), Some(sk), Some(partner_id)) => {
                Ok(Some(Credential::new(ak, sk, partner_id)))
            }
            _ => Ok(None),
        }
    }
}
