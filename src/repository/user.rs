use anyhow::Context;
use chrono::Utc;
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;
use uuid::Uuid;

use super::PgTransaction;
use crate::domain::{CustomUser, FullName, UserEmail};

#[derive(thiserror::Error, Debug)]
pub enum InsertUserError {
    #[error("A user with this email already exists.")]
    DuplicateEmail,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[tracing::instrument(skip_all)]
pub async fn insert_user(
    email: &UserEmail,
    full_name: &FullName,
    password_hash: Secret<String>,
    transaction: &mut PgTransaction,
) -> Result<CustomUser, InsertUserError> {
    let user = sqlx::query_as::<_, CustomUser>(
        r#"
        INSERT INTO users (id, email, full_name, password, date_joined)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, full_name, is_active, is_staff, date_joined, last_login
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_ref())
    .bind(full_name.as_ref())
    .bind(password_hash.expose_secret())
    .bind(Utc::now())
    .fetch_one(&mut **transaction)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            InsertUserError::DuplicateEmail
        }
        e => InsertUserError::Unexpected(anyhow::Error::new(e).context("Failed to insert new user")),
    })?;

    Ok(user)
}

/// Addresses are compared case-insensitively, matching the `users_email_key` index.
#[tracing::instrument(skip_all)]
pub async fn email_exists(email: &UserEmail, pool: &PgPool) -> Result<bool, anyhow::Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM users
            WHERE lower(email) = lower($1)
        )
        "#,
    )
    .bind(email.as_ref())
    .fetch_one(pool)
    .await
    .context("Failed to check whether the email is already registered.")?;
    Ok(exists)
}
