//! Error types for the signing key resolver and its key-set client.

use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors produced while building a [`SigningKeyResolver`] or while resolving a
/// [`DecodingKey`] for a compact token.
///
/// [`SigningKeyResolver`]: crate::SigningKeyResolver
/// [`DecodingKey`]: jsonwebtoken::DecodingKey
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolverError {
    /// Neither client options nor a client were supplied.
    #[error("an options value must be provided when initializing the signing key resolver")]
    MissingOptions,

    /// The token header could not be decoded.
    #[error("cannot decode token header")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The key-set client failed and the error handler propagated the failure.
    #[error("signing key lookup failed")]
    SigningKey(#[from] SigningKeyError),

    /// The resolved key material is not a usable RSA public key.
    #[error("resolved signing key is not a valid RSA public key")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
}

/// A failure reported by a [`KeySetClient`](crate::KeySetClient) while looking up a signing key.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SigningKeyError {
    /// No key in the set matches the requested key ID.
    #[error("unable to find a signing key that matches '{}'", .kid.as_deref().unwrap_or("<none>"))]
    NotFound {
        /// The key ID that was requested, if any.
        kid: Option<String>,
    },

    /// The key set endpoint refused the request because of rate limiting.
    #[error("too many requests to the JWKS endpoint")]
    RateLimited,

    /// The key set could not be used (empty, malformed, or missing signing keys).
    #[error("jwks error: {0}")]
    Jwks(String),

    /// Transport-level error raised by the client.
    #[error("key set client transport error")]
    Transport(#[source] Box<dyn Error + Send + Sync + 'static>),

    /// A callback-style lookup was requested outside of a Tokio runtime.
    #[error("no tokio runtime available to drive the signing key lookup")]
    NoRuntime,

    /// A callback-style lookup was dropped before completing, e.g. because the
    /// runtime shut down or the client panicked.
    #[error("signing key lookup was cancelled before completing")]
    Cancelled,
}

impl SigningKeyError {
    /// Creates a [`SigningKeyError::NotFound`] for the given key ID.
    pub fn not_found(kid: Option<&str>) -> Self {
        Self::NotFound {
            kid: kid.map(str::to_owned),
        }
    }

    /// Wraps an arbitrary client error as [`SigningKeyError::Transport`].
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self::Transport(error.into())
    }

    /// Returns the failure kind used to decide between "no key" and "error".
    pub const fn kind(&self) -> SigningKeyErrorKind {
        match self {
            Self::NotFound { .. } => SigningKeyErrorKind::NotFound,
            _ => SigningKeyErrorKind::Other,
        }
    }
}

/// The closed set of failure kinds a signing key lookup can end in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SigningKeyErrorKind {
    /// The key set does not contain a key matching the token.
    NotFound,
    /// Any other failure: transport, rate limiting, malformed key set.
    Other,
}

impl SigningKeyErrorKind {
    /// Returns a stable name for the kind.
    ///
    /// This is useful for error messages and logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "SigningKeyNotFoundError",
            Self::Other => "SigningKeyLookupError",
        }
    }
}

impl fmt::Display for SigningKeyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod error_test {
    use super::*;

    #[test]
    fn test_not_found_kind_and_message() {
        let err = SigningKeyError::not_found(Some("abc"));

        assert_eq!(err.kind(), SigningKeyErrorKind::NotFound);
        assert_eq!(err.kind().as_str(), "SigningKeyNotFoundError");
        assert_eq!(
            err.to_string(),
            "unable to find a signing key that matches 'abc'"
        );
    }

    #[test]
    fn test_other_failures_map_to_other_kind() {
        let errors = [
            SigningKeyError::RateLimited,
            SigningKeyError::Jwks("no keys".to_owned()),
            SigningKeyError::transport("connection reset"),
            SigningKeyError::NoRuntime,
            SigningKeyError::Cancelled,
        ];

        for err in errors {
            assert_eq!(err.kind(), SigningKeyErrorKind::Other, "{err}");
        }
    }

    #[test]
    fn test_resolver_error_chains_signing_key_error() {
        let err = ResolverError::from(SigningKeyError::RateLimited);

        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "too many requests to the JWKS endpoint");
    }
}
