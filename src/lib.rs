#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

//! This crate provides the signing key provider a JWT verification layer calls
//! to obtain the public key a token was signed with.
//!
//! The provider looks at the decoded token header, and for `RS256` tokens asks a
//! [`KeySetClient`] (typically a JWKS client) for the key identified by the
//! header `kid`. Missing headers, other algorithms and unknown keys all yield
//! "no key"; other client failures are reported as errors, subject to a
//! configurable [`SigningKeyErrorHandler`].
//!
//! # Examples
//!
//! ```
//! use jwks_provider::{DecodedToken, KeySet, SigningKey, SigningKeyResolver, TokenHeader};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! // A static key set; any `KeySetClient` implementation can be used instead.
//! let keys: KeySet = vec![SigningKey::new(Some("kid-1")).with_rsa_public_key("PEM")]
//!     .into_iter()
//!     .collect();
//!
//! let resolver = SigningKeyResolver::<KeySet>::from_options(keys)?;
//!
//! // awaitable style
//! let decoded = DecodedToken::new(TokenHeader::new("RS256", Some("kid-1")));
//! let provided = resolver.provide(Some(&decoded)).await?;
//! assert_eq!(provided.and_then(|p| p.key).as_deref(), Some("PEM"));
//!
//! // callback style
//! resolver.provide_with_callback(Some(&decoded), |error, key, _metadata| {
//!     assert!(error.is_none());
//!     assert_eq!(key.as_deref(), Some("PEM"));
//! });
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **`logging`** (default): emit debug records through the `log` facade.
//! - **`tracing`**: emit events through `tracing` instead.

mod observability;
mod prelude;

pub mod client;
pub mod error;
pub mod key;
pub mod resolver;
pub mod token;

// -----------------------
// Re-exports
// -----------------------

pub use crate::{
    client::{KeySetClient, SigningKeyFuture},
    error::{ResolverError, SigningKeyError, SigningKeyErrorKind},
    key::{KeySet, SigningKey},
    resolver::{
        DefaultErrorHandler, ProvidedKey, SigningKeyErrorHandler, SigningKeyResolver,
        SigningKeyResolverBuilder,
    },
    token::{DecodedToken, TokenHeader, SUPPORTED_ALGORITHM},
};
