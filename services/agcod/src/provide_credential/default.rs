use std::sync::Arc;

use async_trait::async_trait;
use agcod_core::Result;
use agcod_core::{Context, ProvideCredential, ProvideCredentialChain};

use crate::provide_credential::ConfigCredentialProvider;
use crate::{Config, Credential};

/// DefaultCredentialProvider will try to load credential from different sources.
///
/// The default chain holds a single [`ConfigCredentialProvider`], which
/// already falls back to the environment field by field. Use
/// [`DefaultCredentialProvider::push_front`] or
/// [`DefaultCredentialProvider::with_chain`] to add other sources.
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new(Arc::new(Config::default()))
    }
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider
    pub fn new(config: Arc<Config>) -> Self {
        let chain = ProvideCredentialChain::new()
            .push(ConfigCredentialProvider::new(config));

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }

    /// Add a credential provider to the front of the default chain.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use agcod::{DefaultCredentialProvider, StaticCredentialProvider};
    ///
    /// let provider = DefaultCredentialProvider::default()
    ///     .push_front(StaticCredentialProvider::new("access_key", "secret_key", "Partner"));
    /// ```
    pub fn push_front(
        mut self,
        provider: impl ProvideCredential<Credential = Credential> + 'static,
    ) -> Self {
        self.chain = self.chain.push_front(provider);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
