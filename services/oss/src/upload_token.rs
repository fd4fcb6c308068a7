use crate::constants::FIELD_SEPARATOR;
use crate::RequestSigner;
use log::debug;
use osssign_core::hash::{base64_decode, base64_encode};
use osssign_core::time::{epoch_seconds, format_rfc3339, from_epoch_seconds};
use osssign_core::utils::Redact;
use osssign_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// UploadPolicy is the payload bundled into an upload token.
///
/// Field order is the serialization order, so the same policy always
/// encodes to the same JSON text:
///
/// ```json
/// {"deadline":1700003600,"requestIp":"1.2.3.4"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPolicy {
    /// Expiry in whole seconds since the UNIX epoch.
    pub deadline: i64,
    /// Address the token is pinned to, if any.
    pub request_ip: Option<String>,
}

impl UploadPolicy {
    /// Whether the policy is still usable at `epoch_secs`.
    ///
    /// A token is valid up to and including its deadline second.
    pub fn is_valid_at(&self, epoch_secs: i64) -> bool {
        epoch_secs <= self.deadline
    }

    /// Whether a request from `remote_ip` may use this policy.
    pub fn allows_ip(&self, remote_ip: Option<&str>) -> bool {
        match &self.request_ip {
            None => true,
            Some(pinned) => remote_ip == Some(pinned.as_str()),
        }
    }

    fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(base64_encode(json.as_bytes()))
    }

    fn decode(encoded: &str) -> Result<Self> {
        let json = base64_decode(encoded)?;
        serde_json::from_slice(&json)
            .map_err(|e| Error::token_invalid("upload policy is not valid json").with_source(e))
    }
}

/// UploadToken is a parsed `access_key_id:signature:encoded_policy` string.
///
/// Parsing only checks the structure. Use
/// [`RequestSigner::verify_upload_token`] to authenticate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadToken {
    /// Access key id that signed the token.
    pub access_key_id: String,
    /// Base64 HMAC-SHA1 over the bytes of `encoded_policy`.
    pub signature: String,
    /// Base64 of the policy JSON.
    pub encoded_policy: String,
}

impl UploadToken {
    /// Split a token into its three fields.
    ///
    /// Exactly three non-empty, colon separated fields are required.
    pub fn parse(token: &str) -> Result<Self> {
        let mut fields = token.split(FIELD_SEPARATOR);
        let (Some(access_key_id), Some(signature), Some(encoded_policy), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::token_invalid(
                "upload token must have exactly three fields",
            ));
        };
        if access_key_id.is_empty() || signature.is_empty() || encoded_policy.is_empty() {
            return Err(Error::token_invalid("upload token has an empty field"));
        }

        Ok(Self {
            access_key_id: access_key_id.to_string(),
            signature: signature.to_string(),
            encoded_policy: encoded_policy.to_string(),
        })
    }

    /// Decode the policy without checking the signature.
    pub fn policy(&self) -> Result<UploadPolicy> {
        UploadPolicy::decode(&self.encoded_policy)
    }
}

impl Display for UploadToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            self.access_key_id, self.signature, self.encoded_policy
        )
    }
}

impl RequestSigner {
    /// Issue an upload token valid for `expires_in` from now.
    ///
    /// The token grants the full rights of this key pair until its deadline,
    /// optionally only to requests coming from `request_ip`.
    pub fn upload_token(&self, expires_in: Duration, request_ip: Option<&str>) -> Result<String> {
        let issued_at = epoch_seconds(self.get_time());
        let deadline = i64::try_from(expires_in.as_secs())
            .ok()
            .and_then(|secs| issued_at.checked_add(secs))
            .ok_or_else(|| Error::unexpected("upload token deadline overflows"))?;

        let policy = UploadPolicy {
            deadline,
            request_ip: request_ip.map(str::to_string),
        };
        let encoded_policy = policy.encode()?;
        let signature = self.key().base64_sign(encoded_policy.as_bytes());

        debug!(
            "issued upload token for access key {} expiring at {}",
            Redact::from(self.access_key_id()),
            from_epoch_seconds(deadline).map_or_else(|_| deadline.to_string(), format_rfc3339)
        );

        Ok(UploadToken {
            access_key_id: self.access_key_id().to_string(),
            signature,
            encoded_policy,
        }
        .to_string())
    }

    /// Authenticate an upload token issued by this key pair.
    ///
    /// Checks, in order: structure, access key id, signature (constant
    /// time), deadline against the current time, and the pinned address
    /// against `remote_ip`.
    pub fn verify_upload_token(&self, token: &str, remote_ip: Option<&str>) -> Result<UploadPolicy> {
        let token = UploadToken::parse(token)?;
        if token.access_key_id != self.access_key_id() {
            return Err(Error::token_invalid("upload token signed by another key"));
        }

        let tag = base64_decode(&token.signature)?;
        if !self.key().verify(token.encoded_policy.as_bytes(), &tag) {
            return Err(Error::token_invalid("upload token signature mismatch"));
        }

        let policy = token.policy()?;
        if !policy.is_valid_at(epoch_seconds(self.get_time())) {
            return Err(Error::token_expired(format!(
                "upload token expired at {}",
                policy.deadline
            )));
        }
        if !policy.allows_ip(remote_ip) {
            return Err(Error::token_denied(
                "upload token is pinned to another address",
            ));
        }

        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osssign_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const ISSUED_AT: i64 = 1_700_000_000;

    fn signer_at(secs: i64) -> RequestSigner {
        RequestSigner::create("AK1", "SECRET1")
            .expect("valid credential")
            .with_time(from_epoch_seconds(secs).expect("valid time"))
    }

    #[test]
    fn test_upload_token_vector() -> Result<()> {
        let token = signer_at(ISSUED_AT).upload_token(Duration::from_secs(3600), Some("1.2.3.4"))?;
        assert_eq!(
            token,
            "AK1:c2xHH5wQA/JPoy/3eVj5lonR/Rc=:eyJkZWFkbGluZSI6MTcwMDAwMzYwMCwicmVxdWVzdElwIjoiMS4yLjMuNCJ9"
        );
        Ok(())
    }

    #[test]
    fn test_upload_token_without_ip_vector() -> Result<()> {
        let token = signer_at(ISSUED_AT).upload_token(Duration::from_secs(3600), None)?;
        assert_eq!(
            token,
            "AK1:fMLIWGvC76/p12s6xB8vn/ohLyI=:eyJkZWFkbGluZSI6MTcwMDAwMzYwMCwicmVxdWVzdElwIjpudWxsfQ=="
        );

        let policy = UploadToken::parse(&token)?.policy()?;
        assert_eq!(
            policy,
            UploadPolicy {
                deadline: ISSUED_AT + 3600,
                request_ip: None,
            }
        );
        Ok(())
    }

    #[test]
    fn test_tokens_differ_over_time() -> Result<()> {
        let a = UploadToken::parse(&signer_at(ISSUED_AT).upload_token(Duration::from_secs(60), None)?)?;
        let b = UploadToken::parse(
            &signer_at(ISSUED_AT + 1).upload_token(Duration::from_secs(60), None)?,
        )?;
        assert_ne!(a.encoded_policy, b.encoded_policy);
        assert_ne!(a.signature, b.signature);
        Ok(())
    }

    #[test]
    fn test_verify_upload_token() -> Result<()> {
        let token = signer_at(ISSUED_AT).upload_token(Duration::from_secs(3600), Some("1.2.3.4"))?;

        let policy = signer_at(ISSUED_AT + 10).verify_upload_token(&token, Some("1.2.3.4"))?;
        assert_eq!(policy.deadline, ISSUED_AT + 3600);
        assert_eq!(policy.request_ip.as_deref(), Some("1.2.3.4"));

        // Deadline second itself is still valid.
        signer_at(ISSUED_AT + 3600).verify_upload_token(&token, Some("1.2.3.4"))?;
        Ok(())
    }

    #[test]
    fn test_verify_upload_token_expired() -> Result<()> {
        let token = signer_at(ISSUED_AT).upload_token(Duration::from_secs(3600), None)?;
        let err = signer_at(ISSUED_AT + 3601)
            .verify_upload_token(&token, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenExpired);
        Ok(())
    }

    #[test_case(Some("5.6.7.8"); "other address")]
    #[test_case(None; "unknown address")]
    fn test_verify_upload_token_pinned_ip(remote_ip: Option<&str>) -> Result<()> {
        let token = signer_at(ISSUED_AT).upload_token(Duration::from_secs(3600), Some("1.2.3.4"))?;
        let err = signer_at(ISSUED_AT)
            .verify_upload_token(&token, remote_ip)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenDenied);
        Ok(())
    }

    #[test]
    fn test_verify_upload_token_tampered_policy() -> Result<()> {
        let token = signer_at(ISSUED_AT).upload_token(Duration::from_secs(3600), Some("1.2.3.4"))?;
        let mut parsed = UploadToken::parse(&token)?;
        parsed.encoded_policy = UploadPolicy {
            deadline: ISSUED_AT + 86400,
            request_ip: None,
        }
        .encode()?;

        let err = signer_at(ISSUED_AT)
            .verify_upload_token(&parsed.to_string(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
        Ok(())
    }

    #[test]
    fn test_verify_upload_token_other_secret() -> Result<()> {
        let token = signer_at(ISSUED_AT).upload_token(Duration::from_secs(3600), None)?;
        let other = RequestSigner::create("AK1", "SECRET2")?
            .with_time(from_epoch_seconds(ISSUED_AT)?);

        let err = other.verify_upload_token(&token, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
        Ok(())
    }

    #[test_case(""; "empty")]
    #[test_case("AK1:sig"; "two fields")]
    #[test_case("AK1:sig:policy:extra"; "four fields")]
    #[test_case("AK1::policy"; "empty signature")]
    #[test_case(":sig:policy"; "empty access key")]
    fn test_parse_rejects(token: &str) {
        let err = UploadToken::parse(token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_policy_not_json() -> Result<()> {
        let token = UploadToken::parse(&format!("AK1:sig:{}", base64_encode(b"deadline=1")))?;
        let err = token.policy().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
        Ok(())
    }

    #[test]
    fn test_deadline_overflow() {
        let err = signer_at(ISSUED_AT)
            .upload_token(Duration::from_secs(u64::MAX), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }
}
