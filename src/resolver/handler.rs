use crate::error::{SigningKeyError, SigningKeyErrorKind};

/// Strategy that decides whether a key-set client failure is reported as an
/// error or as "no key".
///
/// The handler is only consulted when the client fails. Returning `None`
/// suppresses the failure and the provider reports that no key is available;
/// returning `Some(error)` propagates `error` to the caller.
///
/// Any `Fn(SigningKeyError) -> Option<SigningKeyError>` closure is a handler.
///
/// # Example
///
/// ```
/// use jwks_provider::{SigningKeyError, SigningKeyErrorHandler};
///
/// #[derive(Debug)]
/// struct SuppressAll;
///
/// impl SigningKeyErrorHandler for SuppressAll {
///     fn handle_signing_key_error(&self, _error: SigningKeyError) -> Option<SigningKeyError> {
///         None
///     }
/// }
///
/// assert!(SuppressAll
///     .handle_signing_key_error(SigningKeyError::RateLimited)
///     .is_none());
/// ```
pub trait SigningKeyErrorHandler: Send + Sync + 'static {
    /// Translates a client failure into the error to report, if any.
    fn handle_signing_key_error(&self, error: SigningKeyError) -> Option<SigningKeyError>;
}

impl<F> SigningKeyErrorHandler for F
where
    F: Fn(SigningKeyError) -> Option<SigningKeyError> + Send + Sync + 'static,
{
    fn handle_signing_key_error(&self, error: SigningKeyError) -> Option<SigningKeyError> {
        self(error)
    }
}

/// The handler used when none is configured.
///
/// A missing key is not an error: the token simply cannot be verified with
/// this key set. Every other failure (transport, rate limiting, malformed key
/// set) is propagated unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl SigningKeyErrorHandler for DefaultErrorHandler {
    fn handle_signing_key_error(&self, error: SigningKeyError) -> Option<SigningKeyError> {
        match error.kind() {
            SigningKeyErrorKind::NotFound => None,
            SigningKeyErrorKind::Other => Some(error),
        }
    }
}

#[cfg(test)]
mod handler_test {
    use super::*;

    #[test]
    fn test_default_handler_suppresses_not_found() {
        let handled =
            DefaultErrorHandler.handle_signing_key_error(SigningKeyError::not_found(Some("k")));
        assert!(handled.is_none());
    }

    #[test]
    fn test_default_handler_propagates_other_failures_unchanged() {
        let handled = DefaultErrorHandler
            .handle_signing_key_error(SigningKeyError::Jwks("bad key set".to_owned()));

        assert!(matches!(handled, Some(SigningKeyError::Jwks(ref msg)) if msg == "bad key set"));
    }

    #[test]
    fn test_closure_handler() {
        let handler = |error: SigningKeyError| match error {
            SigningKeyError::RateLimited => None,
            other => Some(other),
        };

        assert!(handler
            .handle_signing_key_error(SigningKeyError::RateLimited)
            .is_none());
        assert!(handler
            .handle_signing_key_error(SigningKeyError::not_found(None))
            .is_some());
    }
}
