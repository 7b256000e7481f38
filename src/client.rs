//! The key-set client consumed by the resolver.

use crate::error::SigningKeyError;
use crate::key::SigningKey;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by [`KeySetClient::get_signing_key`].
pub type SigningKeyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Arc<SigningKey>, SigningKeyError>> + Send + 'a>>;

/// A source of public signing keys, queryable by key ID.
///
/// Implementations own fetching, caching and parsing of the key set. The
/// resolver constructs one client per instance and shares it across every
/// lookup, so `get_signing_key` must tolerate concurrent outstanding calls.
pub trait KeySetClient: Send + Sync + 'static {
    /// Options used to construct the client. Opaque to the resolver.
    type Options: Send + 'static;

    /// Constructs a client from its options.
    fn from_options(options: Self::Options) -> Self
    where
        Self: Sized;

    /// Looks up the signing key for `kid`.
    ///
    /// `kid` is forwarded as found in the token header and may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`SigningKeyError::NotFound`] if no key matches, or any other
    /// [`SigningKeyError`] variant if the key set could not be consulted.
    fn get_signing_key<'a>(&'a self, kid: Option<&'a str>) -> SigningKeyFuture<'a>;
}
