use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use ulid::Ulid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlg(String),
    #[error("invalid signing key")]
    InvalidKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn hmac_sha256(secret: &[u8], signing_input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| Error::InvalidKey)?;
    mac.update(signing_input);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time byte comparison; the running time does not depend on where
/// the inputs first differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Create an HS256 signed bearer token.
///
/// # Errors
///
/// Returns an error if claims/header JSON cannot be encoded or the signing
/// key is rejected.
pub fn sign_hs256(secret: &[u8], claims: &TokenClaims) -> Result<String, Error> {
    let header = TokenHeader::hs256();
    let header_b64 = b64e_json(&header)?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let signature = hmac_sha256(secret, signing_input.as_bytes())?;
    let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Verify an HS256 bearer token and return its decoded claims.
///
/// The signature is recomputed from the server-held secret and compared in
/// constant time before any claim is trusted; expiry is checked against the
/// caller-supplied clock.
///
/// # Errors
///
/// Returns an error if:
/// - the token is malformed or contains invalid base64/json,
/// - the header names any algorithm other than HS256,
/// - the signature does not match,
/// - the token is past its expiry.
pub fn verify_hs256(token: &str, secret: &[u8], now_unix_seconds: i64) -> Result<TokenClaims, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let sig_b64 = parts.next().ok_or(Error::TokenFormat)?;
    if parts.next().is_some() {
        return Err(Error::TokenFormat);
    }

    let header: TokenHeader = b64d_json(header_b64)?;
    if header.alg != "HS256" {
        return Err(Error::UnsupportedAlg(header.alg));
    }

    let signing_input = format!("{header_b64}.{claims_b64}");
    let expected = hmac_sha256(secret, signing_input.as_bytes())?;
    let provided = Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| Error::Base64)?;
    if !constant_time_eq(&expected, &provided) {
        return Err(Error::InvalidSignature);
    }

    let claims: TokenClaims = b64d_json(claims_b64)?;
    if claims.exp <= now_unix_seconds {
        return Err(Error::Expired);
    }

    Ok(claims)
}

/// Issues and verifies bearer tokens with a server-held secret.
///
/// Stateless by design: a token is valid iff its signature matches the
/// secret and it has not expired, so no session table exists and rotation of
/// the secret invalidates everything outstanding.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    secret: SecretString,
    ttl_seconds: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: SecretString, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl_seconds,
        }
    }

    /// Issue a token for the given subject, expiring after the configured TTL.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue(&self, sub: &str) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: sub.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
            jti: Ulid::new().to_string(),
        };

        sign_hs256(self.secret.expose_secret().as_bytes(), &claims)
    }

    /// Verify a token against the secret and the current time.
    ///
    /// # Errors
    /// Returns the verify error kind; callers gating requests must collapse
    /// all kinds into one externally visible rejection.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, Error> {
        verify_hs256(
            token,
            self.secret.expose_secret().as_bytes(),
            Utc::now().timestamp(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixed claims so signing is fully deterministic.
    const NOW: i64 = 1_700_000_000;
    const SECRET: &[u8] = b"an-uncommonly-average-test-secret";

    fn test_claims(sub: &str) -> TokenClaims {
        TokenClaims {
            sub: sub.to_string(),
            iat: NOW,
            exp: NOW + 120,
            jti: "01HF4VT5VETJ92ZQD23M3Y7A9G".to_string(),
        }
    }

    #[test]
    fn sign_is_deterministic_for_fixed_claims() -> Result<(), Error> {
        let first = sign_hs256(SECRET, &test_claims("alice"))?;
        let second = sign_hs256(SECRET, &test_claims("alice"))?;

        assert_eq!(first, second);
        assert_eq!(first.split('.').count(), 3);
        Ok(())
    }

    #[test]
    fn sign_and_verify_roundtrip() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("alice"))?;
        let verified = verify_hs256(&token, SECRET, NOW)?;

        assert_eq!(verified, test_claims("alice"));
        Ok(())
    }

    #[test]
    fn rejects_wrong_secret() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("alice"))?;
        let result = verify_hs256(&token, b"a-different-secret", NOW);

        assert!(matches!(result, Err(Error::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn rejects_expired_token() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("alice"))?;

        let result = verify_hs256(&token, SECRET, NOW + 120);
        assert!(matches!(result, Err(Error::Expired)));

        // one second before expiry still passes
        let verified = verify_hs256(&token, SECRET, NOW + 119)?;
        assert_eq!(verified.sub, "alice");
        Ok(())
    }

    #[test]
    fn rejects_tampered_claims() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("alice"))?;
        let mut parts = token.split('.');
        let header = parts.next().ok_or(Error::TokenFormat)?;
        let sig = parts.nth(1).ok_or(Error::TokenFormat)?;

        let forged_claims = b64e_json(&test_claims("mallory"))?;
        let forged = format!("{header}.{forged_claims}.{sig}");

        let result = verify_hs256(&forged, SECRET, NOW);
        assert!(matches!(result, Err(Error::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn rejects_tampered_signature() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("alice"))?;
        let flipped = if token.ends_with('A') {
            format!("{}B", &token[..token.len() - 1])
        } else {
            format!("{}A", &token[..token.len() - 1])
        };

        let result = verify_hs256(&flipped, SECRET, NOW);
        assert!(matches!(
            result,
            Err(Error::InvalidSignature | Error::Base64)
        ));
        Ok(())
    }

    #[test]
    fn rejects_malformed_tokens() {
        for garbage in ["", "a", "a.b", "a.b.c.d", "not a token at all"] {
            let result = verify_hs256(garbage, SECRET, NOW);
            assert!(result.is_err(), "accepted: {garbage}");
        }
    }

    #[test]
    fn rejects_unsupported_algorithm() -> Result<(), Error> {
        let header = TokenHeader {
            alg: "none".to_string(),
            typ: "JWT".to_string(),
        };
        let header_b64 = b64e_json(&header)?;
        let claims_b64 = b64e_json(&test_claims("alice"))?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = hmac_sha256(SECRET, signing_input.as_bytes())?;
        let token = format!(
            "{signing_input}.{}",
            Base64UrlUnpadded::encode_string(&signature)
        );

        let result = verify_hs256(&token, SECRET, NOW);
        assert!(matches!(result, Err(Error::UnsupportedAlg(alg)) if alg == "none"));
        Ok(())
    }

    #[test]
    fn signer_issues_verifiable_tokens() -> Result<(), Error> {
        let signer = TokenSigner::new(SecretString::from("hush".to_string()), 600);
        let token = signer.issue("alice")?;

        let claims = signer.verify(&token)?;
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 600);
        assert!(!claims.jti.is_empty());
        Ok(())
    }

    #[test]
    fn signer_tokens_carry_unique_ids() -> Result<(), Error> {
        let signer = TokenSigner::new(SecretString::from("hush".to_string()), 600);
        let first = signer.verify(&signer.issue("alice")?)?;
        let second = signer.verify(&signer.issue("alice")?)?;

        assert_ne!(first.jti, second.jti);
        Ok(())
    }

    #[test]
    fn signer_rejects_foreign_tokens() -> Result<(), Error> {
        let ours = TokenSigner::new(SecretString::from("hush".to_string()), 600);
        let theirs = TokenSigner::new(SecretString::from("not hush".to_string()), 600);

        let token = theirs.issue("alice")?;
        assert!(matches!(ours.verify(&token), Err(Error::InvalidSignature)));
        Ok(())
    }
}
