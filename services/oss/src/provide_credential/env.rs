use crate::{Config, Credential};
use async_trait::async_trait;
use log::debug;
use osssign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `OSS_ACCESS_KEY_ID`: the access key id
/// - `OSS_ACCESS_KEY_SECRET`: the access key secret
///
/// Both must be present, otherwise the provider yields nothing.
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
        let cred = Config::default().from_env(ctx).credential();
        if cred.is_none() {
            debug!("no complete key pair found in environment");
        }

        Ok(cred)
    }
}
