use osssign_core::utils::Redact;
use osssign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key id and its secret.
#[derive(Default, Clone)]
pub struct Credential {
    /// Public identifier of the key pair.
    pub access_key_id: String,
    /// Secret used as HMAC key material.
    pub access_key_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.trim().is_empty() && !self.access_key_secret.trim().is_empty()
    }
}
