use super::handler::{DefaultErrorHandler, SigningKeyErrorHandler};
use super::provider::SigningKeyResolver;
use crate::client::KeySetClient;
use crate::error::ResolverError;
use std::fmt::Debug;
use std::sync::Arc;

/// Builder for [`SigningKeyResolver`].
///
/// Either [`client_options`](Self::client_options) or [`client`](Self::client)
/// must be set before calling [`build`](Self::build).
///
/// # Example
///
/// ```
/// use jwks_provider::{KeySet, SigningKey, SigningKeyError, SigningKeyResolver};
///
/// let keys: KeySet = vec![SigningKey::new(Some("kid-1")).with_public_key("PEM")]
///     .into_iter()
///     .collect();
///
/// let _resolver = SigningKeyResolver::<KeySet>::builder()
///     .client_options(keys)
///     .handle_signing_key_error(|_error: SigningKeyError| -> Option<SigningKeyError> { None })
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SigningKeyResolverBuilder<C: KeySetClient> {
    options: Option<C::Options>,
    client: Option<C>,
    error_handler: Option<Arc<dyn SigningKeyErrorHandler>>,
}

impl<C: KeySetClient> Debug for SigningKeyResolverBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyResolverBuilder")
            .field("options", &self.options.as_ref().map(|_| "<Options>"))
            .field("client", &self.client.as_ref().map(|_| "<KeySetClient>"))
            .field(
                "error_handler",
                &self
                    .error_handler
                    .as_ref()
                    .map(|_| "<SigningKeyErrorHandler>"),
            )
            .finish()
    }
}

impl<C: KeySetClient> Default for SigningKeyResolverBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: KeySetClient> SigningKeyResolverBuilder<C> {
    /// Creates a new `SigningKeyResolverBuilder`.
    pub fn new() -> Self {
        Self {
            options: None,
            client: None,
            error_handler: None,
        }
    }

    /// Sets the options the key-set client is constructed from.
    ///
    /// The options are passed verbatim to [`KeySetClient::from_options`].
    #[must_use]
    pub fn client_options(mut self, options: C::Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets an already constructed key-set client. Takes precedence over
    /// [`client_options`](Self::client_options).
    #[must_use]
    pub fn client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets a custom handler for key-set client failures.
    ///
    /// Defaults to [`DefaultErrorHandler`].
    #[must_use]
    pub fn handle_signing_key_error<H>(mut self, handler: H) -> Self
    where
        H: SigningKeyErrorHandler,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Builds the resolver, constructing the key-set client once.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::MissingOptions`] if neither client options nor a
    /// client were supplied.
    pub fn build(self) -> Result<SigningKeyResolver<C>, ResolverError> {
        let client = match (self.client, self.options) {
            (Some(client), _) => client,
            (None, Some(options)) => C::from_options(options),
            (None, None) => return Err(ResolverError::MissingOptions),
        };

        let error_handler = self
            .error_handler
            .unwrap_or_else(|| Arc::new(DefaultErrorHandler));

        Ok(SigningKeyResolver::new_with(client, error_handler))
    }
}
