//! Core components for signing object storage requests.
//!
//! This crate provides the shared building blocks of the osssign workspace:
//!
//! - [`Error`] and [`ErrorKind`]: the error model used by every crate.
//! - [`hash`]: base64 and HMAC-SHA1 helpers, including [`hash::HmacSha1Key`]
//!   which keeps pre-keyed MAC state that is cloned per signing call.
//! - [`time`]: epoch-second helpers used for upload token deadlines.
//! - [`utils`]: redaction of secrets in logs.
//! - [`Context`]: access to environment variables and files for credential
//!   providers, through the [`Env`] and [`FileRead`] traits.
//! - [`ProvideCredential`], [`ProvideCredentialChain`] and
//!   [`SigningCredential`]: how credentials are discovered.
//!
//! ## Example
//!
//! ```
//! use osssign_core::hash::HmacSha1Key;
//!
//! # fn main() -> osssign_core::Result<()> {
//! let key = HmacSha1Key::new(b"my-secret")?;
//! let digest = key.base64_sign(b"/bucket/object\n");
//! assert_eq!(digest, key.base64_sign(b"/bucket/object\n"));
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, FileRead, NoopEnv, NoopFileRead, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SigningCredential};
