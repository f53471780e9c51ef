//! Session token codec.
//!
//! One signed credential format serves both identity kinds. Tokens are HS256
//! JWTs carrying the subject id, the identity kind, and issue/expiry
//! timestamps. Verification is side-effect-free; the only invalidation
//! mechanism is natural expiry (logout merely clears the cookie, so a stolen
//! token remains valid until it expires).

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Identity kind carried inside a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Phone-verified consumer session.
    Client,
    /// Password-authenticated back-office session.
    Admin,
}

impl SessionKind {
    /// Fixed session lifetime for this kind.
    ///
    /// Clients keep a persisted identity for 7 days; admin sessions are
    /// deliberately shorter.
    #[must_use]
    pub fn ttl(self) -> TimeDelta {
        match self {
            Self::Client => TimeDelta::days(7),
            Self::Admin => TimeDelta::hours(24),
        }
    }

    /// Stable lowercase label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject identifier (client or admin UUID as a string).
    pub sub: String,
    /// Identity kind the subject id refers to.
    pub kind: SessionKind,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Failures raised by the codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is structurally invalid or uses the wrong algorithm.
    #[error("session token is malformed")]
    Malformed,
    /// The signature does not match the configured secret.
    #[error("session token signature is invalid")]
    InvalidSignature,
    /// The token expired.
    #[error("session token has expired")]
    Expired,
    /// A token of one kind was presented where the other kind is required.
    #[error("session token kind mismatch: expected {expected}, got {actual}")]
    WrongKind {
        /// Kind the endpoint requires.
        expected: SessionKind,
        /// Kind carried by the presented token.
        actual: SessionKind,
    },
    /// Signing a new token failed.
    #[error("failed to issue session token: {message}")]
    Issuance {
        /// Underlying signer error.
        message: String,
    },
}

/// A freshly issued session credential plus its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded, signed token.
    pub token: String,
    /// Identity kind the token was issued for.
    pub kind: SessionKind,
    /// Expiry timestamp, mirrored into the cookie max-age.
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from raw secret bytes.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry checks must be exact; the default leeway would let a token
        // outlive its cookie.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Produce a signed, time-bounded credential for the given subject.
    pub fn issue(
        &self,
        subject: &str,
        kind: SessionKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now + kind.ttl();
        let claims = SessionClaims {
            sub: subject.to_owned(),
            kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::Issuance {
                message: err.to_string(),
            })?;
        Ok(IssuedToken {
            token,
            kind,
            expires_at,
        })
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Verify a token and require it to carry a specific kind.
    ///
    /// A valid token of the wrong kind is a verification failure, not a
    /// permission failure: kind-specific endpoints never accept the other
    /// kind's credential.
    pub fn verify_kind(
        &self,
        token: &str,
        expected: SessionKind,
    ) -> Result<SessionClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: claims.kind,
            });
        }
        Ok(claims)
    }
}
