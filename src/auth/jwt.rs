use crate::auth::password::{PasswordDigest, PasswordVerifier};
use crate::types::{AppError, Claims, Result};
use crate::utils::toml_config::{AuthConfig, ConfigError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// Identity fields written into a token.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
}

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication service for JWT token management and password hashing.
///
/// Issues HS256 tokens carrying issuer, audience, subject and username/email
/// claims, validates them without touching the store, and owns the
/// [`PasswordVerifier`] used at registration and login.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
    passwords: PasswordVerifier,
}

impl AuthService {
    /// Creates a new AuthService.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing JWTs (should be at least 32 bytes)
    /// * `issuer` / `audience` - values written into and required from every token
    /// * `lifetime` - how long an issued token stays valid
    pub fn new(jwt_secret: &str, issuer: &str, audience: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            lifetime,
            passwords: PasswordVerifier::new(),
        }
    }

    /// Builds the service from `[auth]`, rejecting an out-of-range lifetime.
    pub fn from_config(
        config: &AuthConfig,
        jwt_secret: &str,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(
            jwt_secret,
            &config.issuer,
            &config.audience,
            config.token_lifetime()?,
        ))
    }

    pub fn token_lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Hashes a new password under a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<PasswordDigest> {
        self.passwords.derive(password)
    }

    /// Verifies a password against a stored salt/hash pair.
    ///
    /// `None` means the login identifier matched no user; the same amount of
    /// hashing is done and the result is `false`.
    pub fn verify_password(&self, password: &str, stored: Option<(&[u8], &[u8])>) -> Result<bool> {
        match stored {
            Some((salt, hash)) => self.passwords.verify(password, salt, hash),
            None => self.passwords.verify_unknown(password),
        }
    }

    /// Issues a token valid from now for the configured lifetime.
    pub fn issue_token(&self, subject: TokenSubject<'_>) -> Result<IssuedToken> {
        self.issue_token_at(subject, Utc::now())
    }

    /// Issues a token as if it had been minted at `issued_at`.
    pub fn issue_token_at(
        &self,
        subject: TokenSubject<'_>,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::Internal("Token expiry is out of range".to_string()))?;
        let claims = Claims {
            sub: subject.user_id.to_string(),
            unique_name: subject.username.to_string(),
            email: subject.email.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken {
            token,
            // Whole seconds, exactly what the `exp` claim carries
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at),
        })
    }

    /// Verifies signature, expiry, issuer and audience and returns the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }
}
