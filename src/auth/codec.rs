// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed-token encode/decode over a process-local symmetric key.
//!
//! Tokens use the standard JWT wire format (`header.claims.signature`,
//! base64url segments, HS256) so they remain readable by any
//! standards-compliant verifier holding the same key.
//!
//! The codec is the only component that touches key material. The key is
//! loaded once at startup and never mutated afterwards, which makes the
//! codec safe to share read-only across concurrent requests. All operations
//! are CPU-bound and non-suspending.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::TokenSettings;

use super::claims::Claims;
use super::error::AuthError;

/// Encodes and verifies signed bearer tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
    validation: Validation,
}

/// A freshly issued token together with its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed token string.
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

impl TokenCodec {
    /// Build a codec from validated settings.
    ///
    /// The secret is required non-empty by configuration validation; an
    /// empty secret never reaches this constructor in a running service.
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The crate default leeway is 60 seconds; clock-skew tolerance is a
        // deployment decision, so it always comes from configuration.
        validation.leeway = settings.leeway_secs;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            ttl_secs: settings.ttl_secs,
            validation,
        }
    }

    /// Issue a token for `subject` using the configured ttl, starting now.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AuthError> {
        let token = self.encode(subject, Utc::now(), self.ttl_secs)?;
        Ok(IssuedToken {
            token,
            expires_in: self.ttl_secs,
        })
    }

    /// Produce a signed token for `subject`, issued at `issued_at` and
    /// expiring `ttl_secs` later.
    pub fn encode(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl_secs: u64,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(subject, issued_at, ttl_secs);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("failed to sign token: {e}")))
    }

    /// Parse and verify a token string.
    ///
    /// Fails with `MalformedToken` when the structure cannot be parsed,
    /// `InvalidSignature` when the signature does not match, and
    /// `TokenExpired` when the expiry (minus leeway) has passed.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| map_token_error(&e))?;
        Ok(data.claims)
    }

    /// True iff the token verifies, is unexpired, and was issued for
    /// `expected_subject`.
    ///
    /// A token that verifies cryptographically but carries a different
    /// subject belongs to another identity context and must never
    /// authenticate this one.
    pub fn validate(&self, token: &str, expected_subject: &str) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.sub == expected_subject,
            Err(_) => false,
        }
    }
}

fn map_token_error(error: &jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Duration;

    fn settings(secret: &str, leeway_secs: u64) -> TokenSettings {
        TokenSettings {
            secret: secret.to_string(),
            ttl_secs: 3600,
            leeway_secs,
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&settings("test-secret-key-that-is-long-enough", 0))
    }

    #[test]
    fn decode_of_encode_round_trips_subject() {
        let codec = codec();
        let issued_at = Utc::now();
        let token = codec.encode("user@example.com", issued_at, 3600).unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn issue_uses_configured_ttl() {
        let codec = codec();
        let issued = codec.issue("user@example.com").unwrap();
        assert_eq!(issued.expires_in, 3600);

        let claims = codec.decode(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_fails_with_token_expired() {
        let codec = codec();
        // Issued 3601 seconds ago with a 3600 second ttl: one second past
        // expiry, signature still valid.
        let issued_at = Utc::now() - Duration::seconds(3601);
        let token = codec.encode("user@example.com", issued_at, 3600).unwrap();

        assert_eq!(codec.decode(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn leeway_tolerates_recent_expiry() {
        let strict = TokenCodec::new(&settings("test-secret-key-that-is-long-enough", 0));
        let lenient = TokenCodec::new(&settings("test-secret-key-that-is-long-enough", 60));

        let issued_at = Utc::now() - Duration::seconds(3630);
        let token = strict.encode("user@example.com", issued_at, 3600).unwrap();

        assert_eq!(strict.decode(&token), Err(AuthError::TokenExpired));
        assert!(lenient.decode(&token).is_ok());
    }

    #[test]
    fn single_bit_flip_in_signature_fails_verification() {
        let codec = codec();
        let token = codec.issue("user@example.com").unwrap().token;

        let (payload, signature) = token.rsplit_once('.').unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(signature).unwrap();
        raw[0] ^= 0x01;
        let tampered = format!("{payload}.{}", URL_SAFE_NO_PAD.encode(raw));

        assert_eq!(codec.decode(&tampered), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn token_signed_with_other_key_fails_verification() {
        let codec = codec();
        let other = TokenCodec::new(&settings("a-completely-different-secret-key!", 0));
        let token = other.issue("user@example.com").unwrap().token;

        assert_eq!(codec.decode(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_fails_as_malformed() {
        let codec = codec();
        assert_eq!(codec.decode("not-a-token"), Err(AuthError::MalformedToken));
        assert_eq!(codec.decode(""), Err(AuthError::MalformedToken));
        assert_eq!(
            codec.decode("stray.garbage.segments"),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn validate_rejects_foreign_subject() {
        let codec = codec();
        let token = codec.issue("user@example.com").unwrap().token;

        // Verifies cryptographically, but belongs to a different identity.
        assert!(!codec.validate(&token, "other@example.com"));
        assert!(codec.validate(&token, "user@example.com"));
    }

    #[test]
    fn validate_rejects_expired_token() {
        let codec = codec();
        let issued_at = Utc::now() - Duration::seconds(7200);
        let token = codec.encode("user@example.com", issued_at, 3600).unwrap();

        assert!(!codec.validate(&token, "user@example.com"));
    }
}
