use super::builder::SigningKeyResolverBuilder;
use super::handler::SigningKeyErrorHandler;
use crate::client::KeySetClient;
use crate::error::{ResolverError, SigningKeyError};
use crate::key::SigningKey;
use crate::prelude::{debug, warn};
use crate::token::DecodedToken;
use jsonwebtoken::DecodingKey;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Key material resolved by [`SigningKeyResolver::provide`].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ProvidedKey {
    /// The public key to verify with, or `None` when the key set had no usable key.
    pub key: Option<String>,
}

/// Resolves the public key a token was signed with, by asking a [`KeySetClient`].
///
/// The resolver is built once (see [`SigningKeyResolver::builder`]) and then
/// invoked for every token a verification layer sees. It offers two entry
/// points that run the same decision sequence:
///
/// - [`provide`](Self::provide): awaitable.
/// - [`provide_with_callback`](Self::provide_with_callback): reports through a
///   completion callback, invoked exactly once.
///
/// Only `RS256` tokens carrying a header are looked up. Everything else yields
/// "no key" without contacting the client.
///
/// Cloning is cheap: clones share the same client.
pub struct SigningKeyResolver<C: KeySetClient> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    client: C,
    error_handler: Arc<dyn SigningKeyErrorHandler>,
}

enum Lookup {
    Found(Arc<SigningKey>),
    Suppressed,
    Failed(SigningKeyError),
}

impl<C: KeySetClient> Inner<C> {
    async fn lookup(&self, kid: Option<&str>) -> Lookup {
        match self.client.get_signing_key(kid).await {
            Ok(key) => Lookup::Found(key),
            Err(error) => {
                let kind = error.kind();
                match self.error_handler.handle_signing_key_error(error) {
                    None => {
                        debug!(
                            "Signing key lookup for kid {:?} failed ({}); reporting no key",
                            kid, kind
                        );
                        Lookup::Suppressed
                    }
                    Some(error) => Lookup::Failed(error),
                }
            }
        }
    }
}

impl<C: KeySetClient> Clone for SigningKeyResolver<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: KeySetClient> Debug for SigningKeyResolver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyResolver")
            .field("client", &"<KeySetClient>")
            .field("error_handler", &"<SigningKeyErrorHandler>")
            .finish()
    }
}

impl<C: KeySetClient> SigningKeyResolver<C> {
    /// Returns a builder for configuring the resolver.
    pub fn builder() -> SigningKeyResolverBuilder<C> {
        SigningKeyResolverBuilder::new()
    }

    /// Creates a resolver whose client is constructed from `options`, using the
    /// default error handler.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::MissingOptions`] if `options` is `None`. No
    /// client is constructed in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use jwks_provider::{KeySet, ResolverError, SigningKeyResolver};
    ///
    /// let err = SigningKeyResolver::<KeySet>::from_options(None).unwrap_err();
    /// assert!(matches!(err, ResolverError::MissingOptions));
    ///
    /// let resolver = SigningKeyResolver::<KeySet>::from_options(KeySet::new())?;
    /// assert!(resolver.client().is_empty());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_options(options: impl Into<Option<C::Options>>) -> Result<Self, ResolverError> {
        let builder = Self::builder();
        match options.into() {
            Some(options) => builder.client_options(options).build(),
            None => builder.build(),
        }
    }

    pub(super) fn new_with(client: C, error_handler: Arc<dyn SigningKeyErrorHandler>) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                error_handler,
            }),
        }
    }

    /// Returns the key-set client shared by every lookup.
    pub fn client(&self) -> &C {
        &self.inner.client
    }

    /// Resolves the signing key for `decoded`.
    ///
    /// Resolves to:
    /// - `Ok(None)` when the token has no header or its algorithm is not `RS256`;
    /// - `Ok(Some(ProvidedKey { key }))` when the client returned a key;
    /// - `Ok(Some(ProvidedKey { key: None }))` when the client failed and the
    ///   error handler suppressed the failure.
    ///
    /// # Errors
    ///
    /// Returns the failure propagated by the error handler.
    pub async fn provide(
        &self,
        decoded: Option<&DecodedToken>,
    ) -> Result<Option<ProvidedKey>, SigningKeyError> {
        let Some(kid) = key_id_to_lookup(decoded) else {
            return Ok(None);
        };

        match self.inner.lookup(kid.as_deref()).await {
            Lookup::Found(key) => Ok(Some(ProvidedKey {
                key: key.key_material().map(str::to_owned),
            })),
            Lookup::Suppressed => Ok(Some(ProvidedKey { key: None })),
            Lookup::Failed(error) => Err(error),
        }
    }

    /// Resolves the signing key for `decoded` and reports the outcome through
    /// `callback` as `(error, key, key_metadata)`.
    ///
    /// The callback is invoked exactly once:
    /// - `(None, None, None)` when there is no key to provide;
    /// - `(None, key_material, Some(key))` when the client returned a key;
    /// - `(Some(error), None, None)` when the error handler propagated a failure.
    ///
    /// When no lookup is needed the callback runs before this method returns.
    /// Otherwise the lookup is spawned on the current Tokio runtime; called
    /// outside of a runtime, the callback receives [`SigningKeyError::NoRuntime`].
    /// If the spawned lookup is dropped before it completes (runtime shutdown,
    /// panicking client), the callback receives [`SigningKeyError::Cancelled`].
    pub fn provide_with_callback<F>(&self, decoded: Option<&DecodedToken>, callback: F)
    where
        F: FnOnce(Option<SigningKeyError>, Option<String>, Option<Arc<SigningKey>>)
            + Send
            + 'static,
    {
        let Some(kid) = key_id_to_lookup(decoded) else {
            return callback(None, None, None);
        };

        let Ok(handle) = Handle::try_current() else {
            warn!("Signing key requested outside of a Tokio runtime");
            return callback(Some(SigningKeyError::NoRuntime), None, None);
        };

        let inner = Arc::clone(&self.inner);
        let guard = CallbackGuard::new(callback);
        drop(handle.spawn(async move {
            match inner.lookup(kid.as_deref()).await {
                Lookup::Found(key) => {
                    let material = key.key_material().map(str::to_owned);
                    guard.complete(None, material, Some(key));
                }
                Lookup::Suppressed => guard.complete(None, None, None),
                Lookup::Failed(error) => guard.complete(Some(error), None, None),
            }
        }));
    }

    /// Decodes the header of a compact token, resolves its signing key and
    /// returns it as a [`DecodingKey`] ready for `jsonwebtoken::decode`.
    ///
    /// Returns `Ok(None)` whenever no key can be provided for the token.
    ///
    /// # Errors
    ///
    /// - [`ResolverError::InvalidToken`] if the header cannot be decoded.
    /// - [`ResolverError::SigningKey`] if the lookup failure was propagated.
    /// - [`ResolverError::InvalidKey`] if the key material is not an RSA public key PEM.
    pub async fn resolve_decoding_key(
        &self,
        token: &str,
    ) -> Result<Option<DecodingKey>, ResolverError> {
        let decoded = DecodedToken::from_token(token)?;

        match self.provide(Some(&decoded)).await?.and_then(|p| p.key) {
            Some(pem) => DecodingKey::from_rsa_pem(pem.as_bytes())
                .map(Some)
                .map_err(ResolverError::InvalidKey),
            None => Ok(None),
        }
    }
}

// Owns the callback of a spawned lookup. Reports `Cancelled` if dropped unused.
struct CallbackGuard<F>
where
    F: FnOnce(Option<SigningKeyError>, Option<String>, Option<Arc<SigningKey>>),
{
    callback: Option<F>,
}

impl<F> CallbackGuard<F>
where
    F: FnOnce(Option<SigningKeyError>, Option<String>, Option<Arc<SigningKey>>),
{
    fn new(callback: F) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    fn complete(
        mut self,
        error: Option<SigningKeyError>,
        key: Option<String>,
        metadata: Option<Arc<SigningKey>>,
    ) {
        if let Some(callback) = self.callback.take() {
            callback(error, key, metadata);
        }
    }
}

impl<F> Drop for CallbackGuard<F>
where
    F: FnOnce(Option<SigningKeyError>, Option<String>, Option<Arc<SigningKey>>),
{
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            warn!("Signing key lookup dropped before completing");
            callback(Some(SigningKeyError::Cancelled), None, None);
        }
    }
}

// Returns the key ID to look up, or `None` when the token cannot have a key.
// The inner `Option` is the `kid` itself, which may be absent.
fn key_id_to_lookup(decoded: Option<&DecodedToken>) -> Option<Option<String>> {
    let Some(header) = decoded.and_then(DecodedToken::header) else {
        debug!("Token has no header; no signing key to provide");
        return None;
    };

    if !header.is_supported_algorithm() {
        debug!(
            "Token algorithm {:?} is not supported; no signing key to provide",
            header.alg
        );
        return None;
    }

    Some(header.kid.clone())
}
