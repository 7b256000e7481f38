//! Decoded token types handed to the signing key provider.

use serde::{Deserialize, Serialize};

/// The only signing algorithm keys are resolved for.
pub const SUPPORTED_ALGORITHM: &str = "RS256";

/// The protected header of a decoded JWT.
///
/// Only the fields the provider looks at are kept. All of them are optional,
/// since a header is not validated before it reaches the provider.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Signing algorithm (`alg`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Key ID (`kid`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Token type (`typ`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl TokenHeader {
    /// Creates a header with the given algorithm and key ID.
    pub fn new(alg: impl Into<String>, kid: Option<&str>) -> Self {
        Self {
            alg: Some(alg.into()),
            kid: kid.map(str::to_owned),
            typ: None,
        }
    }

    /// Returns `true` when the header names the supported algorithm exactly.
    pub fn is_supported_algorithm(&self) -> bool {
        self.alg.as_deref() == Some(SUPPORTED_ALGORITHM)
    }
}

impl From<jsonwebtoken::Header> for TokenHeader {
    fn from(header: jsonwebtoken::Header) -> Self {
        // `Algorithm` serializes to its JOSE name ("RS256", "HS256", ...).
        let alg = serde_json::to_value(header.alg)
            .ok()
            .and_then(|value| value.as_str().map(str::to_owned));

        Self {
            alg,
            kid: header.kid,
            typ: header.typ,
        }
    }
}

/// A read-only view of a decoded (not verified) JWT.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DecodedToken {
    /// The decoded protected header, absent if the token could not provide one.
    #[serde(default)]
    pub header: Option<TokenHeader>,
}

impl DecodedToken {
    /// Creates a decoded token with the given header.
    pub fn new(header: TokenHeader) -> Self {
        Self {
            header: Some(header),
        }
    }

    /// Decodes the header of a compact JWT without verifying its signature.
    ///
    /// IMPORTANT: nothing in the returned value is trusted. It only tells the
    /// provider which key to look up.
    ///
    /// # Errors
    ///
    /// Returns the `jsonwebtoken` error if the header segment is not valid
    /// base64url-encoded JSON or names an unknown algorithm.
    pub fn from_token(token: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let header = jsonwebtoken::decode_header(token)?;
        Ok(Self::new(TokenHeader::from(header)))
    }

    /// Returns the header, if any.
    pub fn header(&self) -> Option<&TokenHeader> {
        self.header.as_ref()
    }
}
