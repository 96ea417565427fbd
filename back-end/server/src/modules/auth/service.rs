//! Auth service layer.
//!
//! Login accepts a username or an email. Unknown users and wrong passwords
//! produce the same `InvalidCredentials` error so callers cannot probe for
//! accounts. Tokens carry only the user id; every authenticated request
//! reloads the user and re-checks the admin flag.

use chrono::Utc;
use entity::user;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use tracing::{info, warn};

use crate::bootstrap::config::{AdminSeedConfig, JwtConfig};
use crate::modules::auth::jwt::{self, JwtError};
use crate::modules::auth::password::{hash_password, verify_password};
use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::settings::SettingsService;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: user::Model,
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    jwt: &'a JwtConfig,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, jwt: &'a JwtConfig) -> Self {
        Self { db, jwt }
    }

    pub async fn login(&self, identifier: &str, password: &str) -> ServiceResult<LoginResult> {
        let identifier = identifier.trim();
        let user = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(identifier))
                    .add(user::Column::Email.eq(identifier)),
            )
            .one(self.db)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }
        if !user.is_admin {
            warn!(user_id = user.id, "Login rejected: not an admin");
            return Err(ServiceError::AccessDenied);
        }

        let secret = self.signing_key().await?;
        let token = jwt::generate_token(user.id, &secret, self.jwt.expiry_hours)
            .map_err(|e| ServiceError::Internal(format!("Failed to generate token: {}", e)))?;

        info!(user_id = user.id, "Admin logged in");
        Ok(LoginResult { token, user })
    }

    /// Operator secret if configured, otherwise the persisted one.
    pub async fn signing_key(&self) -> ServiceResult<String> {
        match &self.jwt.secret {
            Some(secret) => Ok(secret.clone()),
            None => SettingsService::new(self.db).signing_secret().await,
        }
    }

    /// Resolve a bearer token to a current admin user.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<user::Model> {
        let secret = self.signing_key().await?;
        let data = jwt::validate_token(token, &secret).map_err(|e| match e {
            JwtError::TokenExpired => ServiceError::Unauthorized("Token expired".to_string()),
            _ => ServiceError::Unauthorized("Invalid token".to_string()),
        })?;

        let user = user::Entity::find_by_id(data.claims.user_id)
            .one(self.db)
            .await?
            .filter(|u| u.is_admin)
            .ok_or_else(|| ServiceError::Unauthorized("Invalid user or access denied".to_string()))?;

        Ok(user)
    }

    /// Change the principal's password. Issued tokens stay valid.
    pub async fn change_password(
        &self,
        principal: &user::Model,
        current: &str,
        new: &str,
    ) -> ServiceResult<()> {
        if !verify_password(current, &principal.password_hash) {
            return Err(ServiceError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut active: user::ActiveModel = principal.clone().into();
        active.password_hash = Set(hash_password(new)?);
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(self.db).await?;

        info!(user_id = principal.id, "Password changed");
        Ok(())
    }

    /// Create the configured admin when the users table is empty.
    pub async fn seed_admin(&self, seed: &AdminSeedConfig) -> ServiceResult<Option<user::Model>> {
        if user::Entity::find().count(self.db).await? > 0 {
            return Ok(None);
        }

        let now = Utc::now().fixed_offset();
        let admin = user::ActiveModel {
            username: Set(seed.username.clone()),
            email: Set(seed.email.clone()),
            password_hash: Set(hash_password(&seed.password)?),
            is_admin: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(|e| ServiceError::from_write(e, "Admin user already exists"))?;

        info!(username = %admin.username, "Seeded default admin user");
        Ok(Some(admin))
    }
}
