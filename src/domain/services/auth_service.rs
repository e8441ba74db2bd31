use std::sync::Arc;
use crate::domain::{
    models::{auth::Claims, user::{Role, User}},
    ports::UserRepository,
    validation::{normalize_email, require_text, MAX_SHORT_TEXT},
};
use crate::config::Config;
use crate::error::{AppError, StartupError};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use uuid::Uuid;
use chrono::{Duration, Utc};
use tracing::{info, warn};

pub const TOKEN_AUDIENCE: &str = "ticketing-frontend";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
const MIN_PASSWORD_LEN: usize = 8;

pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    // Verified against when the email is unknown so both failure paths cost the same.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, config: Config) -> Result<Self, StartupError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[config.auth_issuer.as_str()]);

        let dummy_hash = hash_password("timing-equalizer-password")
            .map_err(|e| StartupError::Hashing(e.to_string()))?;

        Ok(Self { repo, config, encoding_key, decoding_key, validation, dummy_hash })
    }

    pub async fn register(&self, input: RegisterUser) -> Result<User, AppError> {
        require_text("Name", &input.name, MAX_SHORT_TEXT)?;
        let email = normalize_email(&input.email)
            .ok_or(AppError::Validation("Email is not valid".into()))?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters", MIN_PASSWORD_LEN
            )));
        }

        let role = match input.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => Role::Attendee,
            Some(raw) => raw.parse::<Role>().map_err(|e| AppError::Validation(e.to_string()))?,
        };
        if role == Role::Admin {
            return Err(AppError::Validation("Administrators cannot self-register".into()));
        }

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Validation("Email is already registered".into()));
        }

        let password_hash = hash_password(&input.password).map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            AppError::Internal
        })?;

        let user = User::new(input.name.trim().to_string(), email, password_hash, role);
        let created = self.repo.create(&user).await.map_err(|e| {
            if e.is_unique_violation() {
                AppError::Validation("Email is already registered".into())
            } else {
                e
            }
        })?;

        info!(user_id = %created.id, role = %created.role, "User registered");
        Ok(created)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = match normalize_email(email) {
            Some(email) => self.repo.find_by_email(&email).await?,
            None => None,
        };

        let stored_hash = user.as_ref().map_or(self.dummy_hash.as_str(), |u| u.password_hash.as_str());
        let verified = verify_password(password, stored_hash);

        match user {
            Some(user) if verified => Ok(user),
            _ => {
                warn!("Rejected login attempt");
                Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()))
            }
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.config.jwt_ttl_minutes)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: user.id.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            email: user.email.clone(),
            role: user.role,
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
    }

    pub async fn find_user(&self, id: &str) -> Result<User, AppError> {
        self.repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("User not found".into()))
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}
