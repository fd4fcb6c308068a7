use crate::constants::*;
use crate::raw_url::RawUrl;
use crate::Credential;
use http::header::{HeaderName, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use log::debug;
use osssign_core::hash::{base64_decode, HmacSha1Key};
use osssign_core::time::{now, DateTime};
use osssign_core::utils::Redact;
use osssign_core::{Error, Result, SigningCredential};
use std::fmt::{Debug, Formatter};

/// RequestSigner produces request signatures and upload tokens for one key pair.
///
/// The secret is absorbed into HMAC-SHA1 key state once at construction and
/// never exposed again. Every operation clones that state into a fresh MAC,
/// so a single `RequestSigner` can be shared across threads without locking.
#[derive(Clone)]
pub struct RequestSigner {
    access_key_id: String,
    key: HmacSha1Key,
    time: Option<DateTime>,
}

impl Debug for RequestSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Create a signer from an access key id and its secret.
    ///
    /// Fails with `CredentialInvalid` if either value is empty or blank, if
    /// the access key id contains `:`, which would make tokens and
    /// authorization values ambiguous, or if it has characters outside
    /// printable ASCII, which no header value can carry.
    pub fn create(access_key_id: &str, access_key_secret: &str) -> Result<Self> {
        if access_key_id.trim().is_empty() || access_key_secret.trim().is_empty() {
            return Err(Error::credential_invalid("empty key"));
        }
        if access_key_id.contains(FIELD_SEPARATOR) {
            return Err(Error::credential_invalid(format!(
                "access key id must not contain '{FIELD_SEPARATOR}'"
            )));
        }
        if !access_key_id.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
            return Err(Error::credential_invalid(
                "access key id must be printable ascii",
            ));
        }

        let key = HmacSha1Key::new(access_key_secret.as_bytes())?;

        Ok(Self {
            access_key_id: access_key_id.to_string(),
            key,
            time: None,
        })
    }

    /// Create a signer from a loaded credential.
    pub fn from_credential(cred: &Credential) -> Result<Self> {
        if !cred.is_valid() {
            return Err(Error::credential_invalid(format!(
                "credential {cred:?} is not usable for signing"
            )));
        }

        Self::create(&cred.access_key_id, &cred.access_key_secret)
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    pub(crate) fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }

    pub(crate) fn key(&self) -> &HmacSha1Key {
        &self.key
    }

    /// The public half of the key pair.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Sign a request and return `<access_key_id>:<base64 digest>`.
    ///
    /// `url` is any URI reference: absolute, a path with an optional query,
    /// or even empty. Its raw path and query are signed exactly as written.
    /// The body is only covered when `content_type` is the form MIME type.
    pub fn sign_request(
        &self,
        url: &str,
        body: Option<&[u8]>,
        content_type: Option<&str>,
    ) -> Result<String> {
        let url = RawUrl::parse(url)?;
        Ok(self.sign_parts(url.path, url.query, body, content_type))
    }

    /// Build the authorization header for a request.
    ///
    /// The returned map holds exactly one entry:
    /// `oss_sdk_authorization: OSS-<access_key_id>:<base64 digest>`.
    pub fn authorization_header(
        &self,
        url: &str,
        body: Option<&[u8]>,
        content_type: Option<&str>,
    ) -> Result<HeaderMap> {
        let url = RawUrl::parse(url)?;
        let value = self.authorization_value(url.path, url.query, body, content_type)?;

        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(authorization_header_name(), value);
        Ok(headers)
    }

    /// Build the authorization header for a request without body.
    pub fn authorization(&self, url: &str) -> Result<HeaderMap> {
        self.authorization_header(url, None, None)
    }

    /// Sign an `http` request in place.
    ///
    /// Path and query are taken from `req.uri`, the content type from the
    /// `Content-Type` header. The path of an `http::Uri` is never empty, so
    /// an absolute URI without a path signs as `/`, the path actually sent.
    pub fn sign(&self, req: &mut http::request::Parts, body: Option<&[u8]>) -> Result<()> {
        let content_type = req
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let value = self.authorization_value(
            req.uri.path(),
            req.uri.query(),
            body,
            content_type.as_deref(),
        )?;
        req.headers.insert(authorization_header_name(), value);

        Ok(())
    }

    /// Check an authorization header value against the request it claims to sign.
    ///
    /// The digest is compared in constant time.
    pub fn verify_request(
        &self,
        url: &str,
        body: Option<&[u8]>,
        content_type: Option<&str>,
        authorization: &str,
    ) -> Result<()> {
        let url = RawUrl::parse(url)?;

        let signed = authorization
            .strip_prefix(OSS_AUTHORIZATION_PREFIX)
            .ok_or_else(|| Error::token_invalid("authorization prefix is missing"))?;
        let (access_key_id, digest) = signed
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| Error::token_invalid("authorization value is malformed"))?;
        if access_key_id != self.access_key_id {
            return Err(Error::token_invalid("authorization signed by another key"));
        }

        let tag = base64_decode(digest)?;
        let content = signable_bytes(url.path, url.query, body, content_type);
        if !self.key.verify(&content, &tag) {
            return Err(Error::token_invalid("request signature mismatch"));
        }

        Ok(())
    }

    fn sign_parts(
        &self,
        path: &str,
        query: Option<&str>,
        body: Option<&[u8]>,
        content_type: Option<&str>,
    ) -> String {
        let content = signable_bytes(path, query, body, content_type);
        debug!(
            "signing request for access key {} over {} bytes",
            Redact::from(&self.access_key_id),
            content.len()
        );

        let digest = self.key.base64_sign(&content);
        format!("{}{FIELD_SEPARATOR}{digest}", self.access_key_id)
    }

    fn authorization_value(
        &self,
        path: &str,
        query: Option<&str>,
        body: Option<&[u8]>,
        content_type: Option<&str>,
    ) -> Result<HeaderValue> {
        let signed = self.sign_parts(path, query, body, content_type);
        let mut value: HeaderValue = format!("{OSS_AUTHORIZATION_PREFIX}{signed}").parse()?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Build the byte string covered by a request signature.
///
/// Layout: raw path, then `?` and the raw query if the query is non-empty,
/// then `\n`, then the body only when `content_type` equals the form MIME
/// type ignoring ASCII case. Nothing is decoded or reordered.
pub fn signable_bytes(
    path: &str,
    query: Option<&str>,
    body: Option<&[u8]>,
    content_type: Option<&str>,
) -> Vec<u8> {
    let query = query.filter(|q| !q.is_empty());
    let body = body.filter(|_| content_type.is_some_and(|ct| ct.eq_ignore_ascii_case(FORM_MIME)));

    let mut s = Vec::with_capacity(
        path.len() + query.map_or(0, |q| q.len() + 1) + 1 + body.map_or(0, <[u8]>::len),
    );
    s.extend_from_slice(path.as_bytes());
    if let Some(query) = query {
        s.push(b'?');
        s.extend_from_slice(query.as_bytes());
    }
    s.push(b'\n');
    if let Some(body) = body {
        s.extend_from_slice(body);
    }

    s
}

fn authorization_header_name() -> HeaderName {
    HeaderName::from_static(OSS_SDK_AUTHORIZATION)
}
