use agcod_core::{Context, ProvideCredential, ProvideCredentialChain, Result, StaticEnv};
use async_trait::async_trait;
use std::collections::HashMap;

/// Reads a token from one env variable.
#[derive(Debug)]
struct EnvToken(&'static str);

#[async_trait]
impl ProvideCredential for EnvToken {
    type Credential = String;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(ctx.env_var(self.0))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from([("FALLBACK_TOKEN".to_string(), "fallback".to_string())]),
    });

    // The first provider has nothing to offer, so the second one wins.
    let chain = ProvideCredentialChain::new()
        .push(EnvToken("PRIMARY_TOKEN"))
        .push(EnvToken("FALLBACK_TOKEN"));

    match chain.provide_credential(&ctx).await? {
        Some(token) => println!("loaded token: {token}"),
        None => println!("no token found"),
    }

    Ok(())
}
