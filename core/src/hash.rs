// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash related utils.

use crate::{Error, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use sha1::Sha1;
use std::fmt::{Debug, Formatter};

/// HMAC with SHA1, the MAC used by every osssign credential.
pub type HmacSha1 = Hmac<Sha1>;

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 decode
pub fn base64_decode(content: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(content)
        .map_err(|e| Error::token_invalid("base64 decode failed").with_source(e))
}

/// Base64 encoded HMAC with SHA1 hash.
///
/// Builds a one-shot key; prefer [`HmacSha1Key`] when the same secret signs
/// many messages.
pub fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> Result<String> {
    Ok(HmacSha1Key::new(key)?.base64_sign(content))
}

/// HmacSha1Key holds HMAC-SHA1 state that has already absorbed the secret.
///
/// The keyed state is computed once in [`HmacSha1Key::new`]. Every signing
/// call works on its own clone, so a shared `HmacSha1Key` never sees
/// concurrent mutation and needs no lock.
#[derive(Clone)]
pub struct HmacSha1Key {
    keyed: HmacSha1,
}

impl HmacSha1Key {
    /// Initialise the MAC with the given key material.
    pub fn new(key: &[u8]) -> Result<Self> {
        let keyed = HmacSha1::new_from_slice(key)
            .map_err(|e| Error::crypto_init(format!("hmac-sha1 rejected key material: {e}")))?;

        Ok(Self { keyed })
    }

    /// Fresh MAC instance for a single message.
    #[inline]
    pub fn mac(&self) -> HmacSha1 {
        self.keyed.clone()
    }

    /// Raw HMAC-SHA1 of `content`.
    pub fn sign(&self, content: &[u8]) -> Vec<u8> {
        let mut h = self.mac();
        h.update(content);

        h.finalize().into_bytes().to_vec()
    }

    /// Base64 encoded HMAC-SHA1 of `content`.
    pub fn base64_sign(&self, content: &[u8]) -> String {
        let mut h = self.mac();
        h.update(content);

        base64_encode(&h.finalize().into_bytes())
    }

    /// Check `tag` against the HMAC-SHA1 of `content` in constant time.
    pub fn verify(&self, content: &[u8], tag: &[u8]) -> bool {
        let mut h = self.mac();
        h.update(content);

        h.verify_slice(tag).is_ok()
    }
}

impl Debug for HmacSha1Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha1Key").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base64_hmac_sha1_known_vector() -> Result<()> {
        let actual = base64_hmac_sha1(b"key", b"The quick brown fox jumps over the lazy dog")?;
        assert_eq!(actual, "3nybhbi3iqa8ino29wqQcBydtNk=");
        Ok(())
    }

    #[test]
    fn test_key_is_reusable() -> Result<()> {
        let key = HmacSha1Key::new(b"SECRET1")?;
        let first = key.base64_sign(b"/a/b?x=1\n");
        let second = key.base64_sign(b"/a/b?x=1\n");
        assert_eq!(first, second);
        assert_eq!(first, "xnEe4cabW5p7BzOzsKFeN4p5wcs=");
        assert_eq!(base64_encode(&key.sign(b"/a/b?x=1\n")), first);
        Ok(())
    }

    #[test]
    fn test_verify() -> Result<()> {
        let key = HmacSha1Key::new(b"SECRET1")?;
        let tag = key.sign(b"payload");
        assert!(key.verify(b"payload", &tag));
        assert!(!key.verify(b"payload2", &tag));
        assert!(!key.verify(b"payload", &tag[..10]));
        Ok(())
    }

    #[test]
    fn test_base64_decode_rejects_garbage() {
        let err = base64_decode("not base64!").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_debug_hides_key() -> Result<()> {
        let key = HmacSha1Key::new(b"SECRET1")?;
        assert!(!format!("{key:?}").contains("SECRET1"));
        Ok(())
    }
}
