//! Signing key resolver: the key provider handed to a JWT verification layer.
//!
//! This module provides the [`SigningKeyResolver`] type, its builder, and the
//! [`SigningKeyErrorHandler`] strategy that decides which key-set client
//! failures are reported as errors.
//!
//! Primary types are re-exported at the crate root.
//!
//! # Example
//!
//! ```
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! use jwks_provider::{DecodedToken, KeySet, SigningKey, SigningKeyResolver, TokenHeader};
//!
//! let keys: KeySet = vec![SigningKey::new(Some("kid-1")).with_public_key("PEM")]
//!     .into_iter()
//!     .collect();
//! let resolver = SigningKeyResolver::<KeySet>::from_options(keys)?;
//!
//! let decoded = DecodedToken::new(TokenHeader::new("RS256", Some("kid-1")));
//! let provided = resolver.provide(Some(&decoded)).await?;
//!
//! assert_eq!(provided.and_then(|p| p.key).as_deref(), Some("PEM"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod handler;
mod provider;

pub use builder::SigningKeyResolverBuilder;
pub use handler::{DefaultErrorHandler, SigningKeyErrorHandler};
pub use provider::{ProvidedKey, SigningKeyResolver};
