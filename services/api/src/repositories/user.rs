//! User repository for database operations
//!
//! Password hashing lives here: the hash algorithm and cost factor are an
//! implementation detail of the persistence layer, not of the handlers.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{Address, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

fn user_from_row(row: &PgRow) -> Result<User> {
    let addresses: Vec<Address> = serde_json::from_value(row.get("addresses"))?;

    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_admin: row.get("is_admin"),
        is_blocked: row.get("is_blocked"),
        phone: row.get("phone"),
        addresses,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a plaintext password
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(hash)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Create a new user with a hashed password
    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = self.hash_password(password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, addresses)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, is_admin, is_blocked, phone,
                      addresses, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(serde_json::Value::Array(vec![]))
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, is_admin, is_blocked, phone,
                   addresses, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, is_admin, is_blocked, phone,
                   addresses, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Persist the mutable fields of a user
    pub async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, is_admin = $5,
                is_blocked = $6, phone = $7, addresses = $8, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_blocked)
        .bind(&user.phone)
        .bind(serde_json::to_value(&user.addresses)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist only the address list of a user
    pub async fn save_addresses(&self, id: Uuid, addresses: &[Address]) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET addresses = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(serde_json::to_value(addresses)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get all users, each with their order count
    pub async fn list_with_order_counts(&self) -> Result<Vec<(User, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.is_admin, u.is_blocked,
                   u.phone, u.addresses, u.created_at, u.updated_at,
                   COUNT(o.id) AS total_orders
            FROM users u
            LEFT JOIN orders o ON o.user_id = u.id
            GROUP BY u.id
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok((user_from_row(row)?, row.get("total_orders"))))
            .collect()
    }

    /// Delete a user by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all users
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
