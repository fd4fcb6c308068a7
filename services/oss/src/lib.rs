//! Object storage request signing and upload tokens.
//!
//! This crate issues the two credentials an object storage HTTP API accepts:
//!
//! - **Request signatures**: an `oss_sdk_authorization` header whose value is
//!   `OSS-<access_key_id>:<base64 HMAC-SHA1>` over the request's raw path,
//!   raw query and, for form-encoded requests only, its body.
//! - **Upload tokens**: `<access_key_id>:<base64 HMAC-SHA1>:<base64 policy>`,
//!   where the policy is `{"deadline":<epoch seconds>,"requestIp":<string|null>}`.
//!   Tokens expire on their own; there is no revocation store.
//!
//! Both are produced by [`RequestSigner`], which can also verify them.
//!
//! ## Quick Start
//!
//! ```
//! use osssign_oss::{RequestSigner, OSS_SDK_AUTHORIZATION};
//! use std::time::Duration;
//!
//! # fn main() -> osssign_core::Result<()> {
//! let signer = RequestSigner::create("my-access-key", "my-secret-key")?;
//!
//! // Sign a request.
//! let headers = signer.authorization("/ajax/bucket/file/create")?;
//! assert!(headers.contains_key(OSS_SDK_AUTHORIZATION));
//!
//! // Issue an upload token valid for one hour from a single address.
//! let token = signer.upload_token(Duration::from_secs(3600), Some("192.168.2.194"))?;
//! let policy = signer.verify_upload_token(&token, Some("192.168.2.194"))?;
//! assert_eq!(policy.request_ip.as_deref(), Some("192.168.2.194"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Credential Sources
//!
//! ```bash
//! export OSS_ACCESS_KEY_ID=your-access-key-id
//! export OSS_ACCESS_KEY_SECRET=your-access-key-secret
//! export OSS_CREDENTIAL_FILE=/etc/oss/credentials.json  # Optional
//! ```
//!
//! [`DefaultCredentialProvider`] checks the environment first and then the
//! credential file (`~/.oss/credentials.json` unless overridden).
//!
//! ```no_run
//! use osssign_core::{Context, OsEnv, ProvideCredential};
//! use osssign_file_read_tokio::TokioFileRead;
//! use osssign_oss::{DefaultCredentialProvider, RequestSigner};
//!
//! #[tokio::main]
//! async fn main() -> osssign_core::Result<()> {
//!     let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);
//!
//!     let Some(cred) = DefaultCredentialProvider::new().provide_credential(&ctx).await? else {
//!         return Ok(());
//!     };
//!     let signer = RequestSigner::from_credential(&cred)?;
//!
//!     let mut req = http::Request::get("https://oss.example.com/bucket/object.txt")
//!         .body(())
//!         .unwrap()
//!         .into_parts()
//!         .0;
//!     signer.sign(&mut req, None)?;
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{FORM_MIME, OSS_AUTHORIZATION_PREFIX, OSS_SDK_AUTHORIZATION};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod raw_url;

mod sign_request;
pub use sign_request::{signable_bytes, RequestSigner};

mod upload_token;
pub use upload_token::{UploadPolicy, UploadToken};

mod provide_credential;
pub use provide_credential::*;
