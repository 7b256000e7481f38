//! Signing key and in-memory key set types.

use crate::client::{KeySetClient, SigningKeyFuture};
use crate::error::SigningKeyError;
use std::collections::HashMap;
use std::sync::Arc;

/// A public signing key as returned by a [`KeySetClient`].
///
/// A key exposes its material either through the standard `public_key` field
/// (for example a PEM derived from an `x5c` certificate) or through the
/// `rsa_public_key` field (a PEM built from the RSA modulus and exponent).
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SigningKey {
    kid: Option<String>,
    alg: Option<String>,
    public_key: Option<String>,
    rsa_public_key: Option<String>,
}

impl SigningKey {
    /// Creates a key without material for the given key ID.
    pub fn new(kid: Option<&str>) -> Self {
        Self {
            kid: kid.map(str::to_owned),
            ..Self::default()
        }
    }

    /// Sets the standard public key field.
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Sets the RSA-specific public key field.
    pub fn with_rsa_public_key(mut self, rsa_public_key: impl Into<String>) -> Self {
        self.rsa_public_key = Some(rsa_public_key.into());
        self
    }

    /// Sets the algorithm advertised for the key.
    pub fn with_algorithm(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }

    /// Returns the key ID (`kid`).
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Returns the algorithm advertised for the key (`alg`).
    pub fn algorithm(&self) -> Option<&str> {
        self.alg.as_deref()
    }

    /// Returns the standard public key field.
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// Returns the RSA-specific public key field.
    pub fn rsa_public_key(&self) -> Option<&str> {
        self.rsa_public_key.as_deref()
    }

    /// Returns the key material to verify with: the standard public key,
    /// falling back to the RSA-specific one when the former is absent or empty.
    pub fn key_material(&self) -> Option<&str> {
        self.public_key()
            .filter(|key| !key.is_empty())
            .or_else(|| self.rsa_public_key())
    }
}

/// An in-memory set of [`SigningKey`]s, keyed by key ID.
///
/// `KeySet` is itself a [`KeySetClient`], which makes it usable for static
/// key configurations and for tests.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct KeySet {
    keys: HashMap<Option<String>, Arc<SigningKey>>,
}

impl KeySet {
    /// Creates an empty `KeySet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jwks_provider::KeySet;
    ///
    /// let set = KeySet::new();
    /// assert!(set.is_empty());
    /// assert!(set.find_signing_key(Some("some-kid")).is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Adds a key to the set. If a key with the same key ID already exists, it is replaced.
    pub fn add_signing_key(&mut self, key: SigningKey) {
        self.keys
            .insert(key.key_id().map(str::to_owned), Arc::new(key));
    }

    /// Returns the key with the given key ID.
    pub fn find_signing_key(&self, kid: Option<&str>) -> Option<&Arc<SigningKey>> {
        self.keys.get(&kid.map(str::to_owned))
    }

    /// Returns an iterator over all keys in the set.
    pub fn signing_keys(&self) -> impl Iterator<Item = &Arc<SigningKey>> {
        self.keys.values()
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    // A token without `kid` can only be matched when the set is unambiguous.
    fn lookup(&self, kid: Option<&str>) -> Result<Arc<SigningKey>, SigningKeyError> {
        if self.keys.is_empty() {
            return Err(SigningKeyError::Jwks(
                "the JWKS endpoint did not contain any keys".to_owned(),
            ));
        }

        let key = match kid {
            Some(kid) => self.find_signing_key(Some(kid)),
            None if self.keys.len() == 1 => self.keys.values().next(),
            None => None,
        };

        key.cloned().ok_or_else(|| SigningKeyError::not_found(kid))
    }
}

impl KeySetClient for KeySet {
    type Options = KeySet;

    fn from_options(options: Self::Options) -> Self {
        options
    }

    fn get_signing_key<'a>(&'a self, kid: Option<&'a str>) -> SigningKeyFuture<'a> {
        Box::pin(async move { self.lookup(kid) })
    }
}

impl Extend<SigningKey> for KeySet {
    fn extend<T: IntoIterator<Item = SigningKey>>(&mut self, iter: T) {
        for key in iter {
            self.add_signing_key(key);
        }
    }
}

impl FromIterator<SigningKey> for KeySet {
    fn from_iter<T: IntoIterator<Item = SigningKey>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
