use crate::constants::*;
use crate::Credential;
use osssign_core::Context;

/// Config carries all the configuration for osssign credential loading.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`OSS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`OSS_ACCESS_KEY_SECRET`]
    pub access_key_secret: Option<String>,
    /// `credential_file` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`OSS_CREDENTIAL_FILE`]
    /// - default to `~/.oss/credentials.json`
    pub credential_file: Option<String>,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(OSS_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(OSS_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(OSS_CREDENTIAL_FILE) {
            self.credential_file.get_or_insert(v);
        }

        self
    }

    /// Path of the credential file, before `~` expansion.
    pub fn credential_file(&self) -> &str {
        self.credential_file
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_FILE)
    }

    /// Build a credential if both halves of the key pair are configured.
    pub fn credential(&self) -> Option<Credential> {
        match (&self.access_key_id, &self.access_key_secret) {
            (Some(ak), Some(sk)) => Some(Credential::new(ak, sk)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osssign_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_from_env_keeps_explicit_values() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (OSS_ACCESS_KEY_ID.to_string(), "env_ak".to_string()),
                (OSS_ACCESS_KEY_SECRET.to_string(), "env_sk".to_string()),
                (OSS_CREDENTIAL_FILE.to_string(), "/etc/oss.json".to_string()),
            ]),
        });

        let config = Config {
            access_key_id: Some("explicit_ak".to_string()),
            ..Default::default()
        }
        .from_env(&ctx);

        assert_eq!(config.access_key_id.as_deref(), Some("explicit_ak"));
        assert_eq!(config.access_key_secret.as_deref(), Some("env_sk"));
        assert_eq!(config.credential_file(), "/etc/oss.json");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default().from_env(&Context::new());
        assert_eq!(config.credential_file(), DEFAULT_CREDENTIAL_FILE);
        assert!(config.credential().is_none());
    }
}
