//! HS256 identity tokens (JWS compact serialization).
//!
//! - `issue` signs `{sub, iat, exp, ...extra}` with the process-wide secret.
//! - `verify` checks structure, algorithm and signature, then expiration.
//! - Every failure is a `TokenError`; callers at the HTTP boundary collapse
//!   them into a single 401.
//!
//! Time is passed in explicitly by the `*_at` variants so expiration can be
//! checked without waiting on the wall clock.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use zeroize::Zeroizing;

/// HS256 keys shorter than the hash output weaken the MAC.
pub const MIN_SECRET_BYTES: usize = 32;

pub const DEFAULT_TOKEN_TTL: TimeDelta = TimeDelta::hours(24);

/// Claim names owned by the codec. Caller-supplied values under these keys are replaced.
const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Construction-time errors. These abort startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecConfigError {
    #[error("signing secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },
    #[error("token ttl must be positive, got {seconds}s")]
    NonPositiveTtl { seconds: i64 },
}

/// Per-call errors.
///
/// The variants exist for diagnostics (logs); they must not be surfaced to
/// clients individually.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
    #[error("malformed token ({0})")]
    Malformed(&'static str),
    #[error("signature verification failed")]
    Signature,
    #[error("token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::Signature,
            ErrorKind::InvalidToken => Self::Malformed("structure"),
            ErrorKind::Base64(_) | ErrorKind::Utf8(_) => Self::Malformed("encoding"),
            ErrorKind::Json(_) => Self::Malformed("json"),
            ErrorKind::MissingRequiredClaim(_) => Self::Malformed("missing claim"),
            _ => Self::Malformed("other"),
        }
    }
}

/// Signing key material.
///
/// Zeroized on drop; `Debug` never prints the bytes.
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CodecConfigError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(CodecConfigError::SecretTooShort {
                min: MIN_SECRET_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Claims carried by every token.
///
/// Registered names (`sub`, `iat`, `exp`) are used on the wire so standard JWT
/// consumers can read them. Anything else lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Extra claims mirroring the subject under `id`.
pub fn id_claims(id: &str) -> Map<String, Value> {
    let mut claims = Map::new();
    claims.insert("id".to_string(), Value::String(id.to_string()));
    claims
}

/// Issues and verifies HS256 tokens.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    ttl: TimeDelta,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.header.alg)
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        // Expiration is checked by `verify_at` against an explicit clock, after
        // the signature. jsonwebtoken only checks signature, algorithm and presence.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            header,
            validation,
            ttl: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: TimeDelta) -> Result<Self, CodecConfigError> {
        if ttl.num_seconds() <= 0 {
            return Err(CodecConfigError::NonPositiveTtl {
                seconds: ttl.num_seconds(),
            });
        }
        self.ttl = TimeDelta::seconds(ttl.num_seconds());
        Ok(self)
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn issue(&self, extra: Map<String, Value>, subject: &str) -> Result<String, TokenError> {
        self.issue_at(extra, subject, Utc::now())
    }

    /// Sign a token for `subject` issued at `now`.
    ///
    /// `sub`, `iat` and `exp` always come from the arguments, never from `extra`.
    /// Identical inputs within the same second produce the identical token.
    pub fn issue_at(
        &self,
        mut extra: Map<String, Value>,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }
        for key in RESERVED_CLAIMS {
            extra.remove(key);
        }

        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp: iat + self.ttl.num_seconds(),
            extra,
        };

        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key).map_err(TokenError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as of `now`.
    ///
    /// Signature first, then subject, then expiration.
    ///
    /// `now` is compared at full precision: any instant after `exp` is expired.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::Malformed("empty subject"));
        }
        if claims.expires_at().is_none_or(|exp| now > exp) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
