//! Authentication service: registration, login, and token refresh.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtAuthConfig;
use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;
use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};

/// Error type for authentication flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),

    #[error(transparent)]
    PasswordError(#[from] PasswordError),

    #[error(transparent)]
    TokenError(#[from] JwtError),
}

/// Issued token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: UserEntity,
    pub tokens: TokenPair,
}

/// Authentication service over the user repository.
pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Result<Self, String> {
        let jwt = JwtConfig::new(
            &jwt_config.private_key,
            &jwt_config.public_key,
            jwt_config.access_token_expiry_secs,
            jwt_config.refresh_token_expiry_secs,
            jwt_config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))?;

        Ok(Self {
            users: UserRepository::new(pool),
            jwt,
        })
    }

    /// Register a new user.
    ///
    /// The profile starts with the standard defaults; the display name is
    /// derived from the email local part and can be changed later.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        validate_password_strength(password).map_err(AuthError::WeakPassword)?;

        let password_hash = hash_password(password)?;
        let name = email.split('@').next().unwrap_or(email);

        let user = self
            .users
            .create(email, &password_hash, name)
            .await?
            .ok_or(AuthError::EmailAlreadyExists)?;

        let tokens = self.issue_tokens(user.id)?;
        Ok(AuthResult { user, tokens })
    }

    /// Verify credentials and issue a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(user.id)?;
        Ok(AuthResult { user, tokens })
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let user_id = extract_user_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        // The account must still exist.
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        Ok(self.issue_tokens(user_id)?)
    }

    fn issue_tokens(&self, user_id: Uuid) -> Result<TokenPair, JwtError> {
        let access_token = self.jwt.generate_access_token(user_id)?;
        let refresh_token = self.jwt.generate_refresh_token(user_id)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }
}

/// Password policy: at least 8 characters with an upper-case letter, a
/// lower-case letter, and a digit.
fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain an upper-case letter".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain a lower-case letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_accepts_valid() {
        assert!(validate_password_strength("Sunday5aside").is_ok());
    }

    #[test]
    fn test_password_strength_rejects_short() {
        assert!(validate_password_strength("Ab1").is_err());
    }

    #[test]
    fn test_password_strength_rejects_missing_classes() {
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
    }
}
