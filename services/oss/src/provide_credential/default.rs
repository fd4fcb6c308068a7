use crate::provide_credential::{ConfigFileCredentialProvider, EnvCredentialProvider};
use crate::Credential;
use async_trait::async_trait;
use osssign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

/// DefaultCredentialProvider is a loader that will try to load credential via default chains.
///
/// Resolution order:
///
/// 1. Environment variables
/// 2. Credential file
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(ConfigFileCredentialProvider::new());

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }

    /// Add a credential provider to the front of the default chain.
    ///
    /// ```
    /// use osssign_oss::{DefaultCredentialProvider, StaticCredentialProvider};
    ///
    /// let provider = DefaultCredentialProvider::new()
    ///     .push_front(StaticCredentialProvider::new("access_key", "secret_key"));
    /// ```
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = Credential>) -> Self {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::StaticCredentialProvider;
    use osssign_core::StaticEnv;
    use osssign_file_read_tokio::TokioFileRead;
    use std::collections::HashMap;

    fn ctx(envs: HashMap<String, String>) -> Context {
        Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: None,
                envs,
            })
    }

    #[tokio::test]
    async fn test_default_loader_without_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        let loader = DefaultCredentialProvider::new();
        let credential = loader.provide_credential(&ctx(HashMap::new())).await.unwrap();

        assert!(credential.is_none());
    }

    #[tokio::test]
    async fn test_default_loader_with_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        let envs = HashMap::from_iter([
            (OSS_ACCESS_KEY_ID.to_string(), "access_key_id".to_string()),
            (
                OSS_ACCESS_KEY_SECRET.to_string(),
                "secret_access_key".to_string(),
            ),
        ]);

        let loader = DefaultCredentialProvider::new();
        let credential = loader.provide_credential(&ctx(envs)).await.unwrap().unwrap();

        assert_eq!("access_key_id", credential.access_key_id);
        assert_eq!("secret_access_key", credential.access_key_secret);
    }

    #[tokio::test]
    async fn test_default_loader_push_front() {
        let envs = HashMap::from_iter([
            (OSS_ACCESS_KEY_ID.to_string(), "access_key_id".to_string()),
            (
                OSS_ACCESS_KEY_SECRET.to_string(),
                "secret_access_key".to_string(),
            ),
        ]);

        let loader = DefaultCredentialProvider::new()
            .push_front(StaticCredentialProvider::new("static_ak", "static_sk"));
        let credential = loader.provide_credential(&ctx(envs)).await.unwrap().unwrap();

        assert_eq!("static_ak", credential.access_key_id);
    }
}
