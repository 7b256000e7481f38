use jsonwebtoken::{decode, encode, Algorithm, EncodingKey, Header, Validation};
use jwks_provider::{
    DecodedToken, KeySet, ResolverError, SigningKey, SigningKeyError, SigningKeyResolver,
};
use serde::{Deserialize, Serialize};

const PRIVATE_KEY: &[u8] = include_bytes!("testdata/keys/rsa-private.pem");
const PUBLIC_KEY: &[u8] = include_bytes!("testdata/keys/rsa-public.pem");
const OTHER_PUBLIC_KEY: &[u8] = include_bytes!("testdata/keys/rsa-public-other.pem");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: u64,
}

fn claims() -> Claims {
    Claims {
        sub: "user-1".to_owned(),
        exp: 4294967295,
    }
}

fn pem(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

// used to generate signed tokens for testing
fn sign_rs256(kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_owned);
    encode(
        &header,
        &claims(),
        &EncodingKey::from_rsa_pem(PRIVATE_KEY).unwrap(),
    )
    .unwrap()
}

fn key_set() -> KeySet {
    vec![
        SigningKey::new(Some("kid-1"))
            .with_algorithm("RS256")
            .with_public_key(pem(PUBLIC_KEY)),
        SigningKey::new(Some("kid-2"))
            .with_algorithm("RS256")
            .with_rsa_public_key(pem(OTHER_PUBLIC_KEY)),
        SigningKey::new(Some("kid-broken")).with_public_key("not a pem"),
    ]
    .into_iter()
    .collect()
}

fn resolver() -> SigningKeyResolver<KeySet> {
    SigningKeyResolver::from_options(key_set()).unwrap()
}

#[tokio::test]
async fn test_resolve_decoding_key_verifies_token() {
    let token = sign_rs256(Some("kid-1"));

    let key = resolver()
        .resolve_decoding_key(&token)
        .await
        .unwrap()
        .expect("key should be resolved");

    let data = decode::<Claims>(&token, &key, &Validation::new(Algorithm::RS256)).unwrap();
    assert_eq!(data.claims, claims());
}

#[tokio::test]
async fn test_resolve_decoding_key_with_wrong_kid_fails_verification() {
    let token = sign_rs256(Some("kid-2"));

    let key = resolver()
        .resolve_decoding_key(&token)
        .await
        .unwrap()
        .expect("key should be resolved");

    let err = decode::<Claims>(&token, &key, &Validation::new(Algorithm::RS256)).unwrap_err();
    assert!(matches!(
        err.kind(),
        jsonwebtoken::errors::ErrorKind::InvalidSignature
    ));
}

#[tokio::test]
async fn test_resolve_decoding_key_unknown_kid_is_none() {
    let token = sign_rs256(Some("unknown"));

    let key = resolver().resolve_decoding_key(&token).await.unwrap();

    assert!(key.is_none());
}

#[tokio::test]
async fn test_resolve_decoding_key_hs256_is_none() {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some("kid-1".to_owned());
    let token = encode(&header, &claims(), &EncodingKey::from_secret(b"secret")).unwrap();

    let key = resolver().resolve_decoding_key(&token).await.unwrap();

    assert!(key.is_none());
}

#[tokio::test]
async fn test_resolve_decoding_key_invalid_token() {
    let result = resolver().resolve_decoding_key("definitely.not.a-token").await;

    assert!(matches!(result, Err(ResolverError::InvalidToken(_))));
}

#[tokio::test]
async fn test_resolve_decoding_key_invalid_key_material() {
    let token = sign_rs256(Some("kid-broken"));

    let result = resolver().resolve_decoding_key(&token).await;

    assert!(matches!(result, Err(ResolverError::InvalidKey(_))));
}

#[tokio::test]
async fn test_resolve_decoding_key_propagates_empty_key_set() {
    let resolver = SigningKeyResolver::<KeySet>::from_options(KeySet::new()).unwrap();
    let token = sign_rs256(Some("kid-1"));

    let result = resolver.resolve_decoding_key(&token).await;

    assert!(matches!(
        result,
        Err(ResolverError::SigningKey(SigningKeyError::Jwks(_)))
    ));
}

#[tokio::test]
async fn test_provide_with_callback_from_compact_token() {
    let decoded = DecodedToken::from_token(&sign_rs256(Some("kid-2"))).unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel();

    resolver().provide_with_callback(Some(&decoded), move |error, key, metadata| {
        let _ = tx.send((error, key, metadata));
    });
    let (error, key, metadata) = rx.await.unwrap();

    assert!(error.is_none());
    assert_eq!(key, Some(pem(OTHER_PUBLIC_KEY)));
    let metadata = metadata.unwrap();
    assert_eq!(metadata.key_id(), Some("kid-2"));
    assert_eq!(metadata.public_key(), None);
}

#[tokio::test]
async fn test_provide_without_kid_is_not_found_with_many_keys() {
    let decoded = DecodedToken::from_token(&sign_rs256(None)).unwrap();

    let provided = resolver().provide(Some(&decoded)).await.unwrap();

    assert_eq!(provided.map(|p| p.key), Some(None));
}
