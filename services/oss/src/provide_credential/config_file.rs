use crate::{Config, Credential};
use async_trait::async_trait;
use log::debug;
use osssign_core::{Context, Error, ProvideCredential, Result};
use serde::Deserialize;

/// ConfigFileCredentialProvider loads a key pair from a JSON file.
///
/// The file looks like:
///
/// ```json
/// {"accessKeyId": "...", "accessKeySecret": "..."}
/// ```
///
/// The path is taken from, in order:
/// - [`ConfigFileCredentialProvider::with_path`]
/// - env value `OSS_CREDENTIAL_FILE`
/// - `~/.oss/credentials.json`
///
/// A missing or unreadable file yields nothing. A file that exists but
/// cannot be parsed is a `ConfigInvalid` error.
#[derive(Debug, Default, Clone)]
pub struct ConfigFileCredentialProvider {
    path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialFile {
    access_key_id: String,
    access_key_secret: String,
}

impl ConfigFileCredentialProvider {
    /// Create a new ConfigFileCredentialProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read credentials from this path instead.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ConfigFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = Config {
            credential_file: self.path.clone(),
            ..Default::default()
        }
        .from_env(ctx);

        let Some(path) = ctx.expand_home_dir(config.credential_file()) else {
            debug!("home dir not found, skip credential file");
            return Ok(None);
        };

        let content = match ctx.file_read(&path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read credential file {path}: {err:?}");
                return Ok(None);
            }
        };

        let file: CredentialFile = serde_json::from_slice(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse credential file {path}")).with_source(e)
        })?;
        debug!("loaded credential from file {path}");

        Ok(Some(Credential::new(
            file.access_key_id,
            file.access_key_secret,
        )))
    }
}
