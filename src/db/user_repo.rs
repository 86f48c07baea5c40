// src/db/user_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// All interactions with the 'users' table, plus the least-loaded attendant
// selection used when assigning passes.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active users only: login and token validation both go through here.
    pub async fn find_active_by_phone(&self, phone: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE phone = $1 AND is_active = TRUE",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        phone: &str,
        email: Option<&str>,
        password_hash: &str,
        role: Role,
        parent_trustee_id: Option<Uuid>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, phone, email, password_hash, role, parent_trustee_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(parent_trustee_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::PhoneAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Applies a partial update with a fixed set of field updaters.
    /// Absent fields keep their current value via COALESCE.
    pub async fn apply_patch<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        is_active: Option<bool>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                is_active = COALESCE($4, is_active),
                password_hash = COALESCE($5, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(is_active)
        .bind(password_hash)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    /// The attendant load balancer: among active ATTENDANT users, pick the
    /// one with the fewest passes assigned on `date`; ties break on the
    /// lowest id. Runs on the caller's transaction so the count and the
    /// pass insert that follows see the same snapshot.
    pub async fn select_least_loaded_attendant<'e, E>(
        &self,
        executor: E,
        date: NaiveDate,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendant = sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM users u
            LEFT JOIN passes p
                ON p.assigned_attendant_id = u.id AND p.date = $1
            WHERE u.role = $2 AND u.is_active = TRUE
            GROUP BY u.id
            ORDER BY COUNT(p.id) ASC, u.id ASC
            LIMIT 1
            "#,
        )
        .bind(date)
        .bind(Role::Attendant)
        .fetch_optional(executor)
        .await?;
        Ok(attendant)
    }
}
