use crate::config::get_config;
use crate::error::{Error, Result};
use crate::models::password_reset::PasswordResetToken;
use crate::models::user::User;
use crate::utils::crypto::{digests_match, hash_password, token_digest, verify_password};
use crate::utils::token::generate_reset_token;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();

        let existing: Option<Uuid> =
            sqlx::query_scalar(r#"SELECT id FROM users WHERE email = $1"#)
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(Error::BadRequest(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %user.id, "Registered new user");
        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        };

        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("Password verification failed: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }

        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    /// Issues an opaque reset token. Only the SHA-256 digest is stored;
    /// the plaintext goes out once, in the reset email.
    pub async fn create_reset_token(&self, email: &str) -> Result<Option<(User, String)>> {
        let email = email.trim().to_lowercase();
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            // The forgot-password endpoint answers 202 either way, so an
            // unknown email must not become an observable error.
            return Ok(None);
        };

        let token = generate_reset_token(48);
        let expires_at = Utc::now() + Duration::minutes(get_config().reset_token_ttl_minutes);

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id)
        .bind(token_digest(&token))
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Some((user, token)))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let digest = token_digest(token);

        let candidates = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT * FROM password_reset_tokens
            WHERE used_at IS NULL AND expires_at > NOW()
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let matched = candidates
            .iter()
            .find(|c| digests_match(&c.token_hash, &digest));
        let Some(matched) = matched else {
            return Err(Error::Unauthorized(
                "Reset token is invalid or has expired".to_string(),
            ));
        };

        let password_hash = hash_password(new_password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query(r#"UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2"#)
            .bind(&password_hash)
            .bind(matched.user_id)
            .execute(&self.pool)
            .await?;

        sqlx::query(r#"UPDATE password_reset_tokens SET used_at = NOW() WHERE id = $1"#)
            .bind(matched.id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = %matched.user_id, "Password reset completed");
        Ok(())
    }
}
