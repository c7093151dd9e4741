use devcamper_core::errors::unique_violation;
use devcamper_core::{AppError, hash_password};
use devcamper_db::PgPool;
use devcamper_models::users::{gravatar_url, normalize_email};
use devcamper_models::{BootcampId, Role, UpdateUserDto, User, UserId};
use sqlx::PgConnection;
use tracing::{debug, info, instrument};

use crate::modules::bootcamps::service::{BootcampService, ONE_PER_PUBLISHER};
use crate::modules::courses::service::CourseService;
use crate::modules::reviews::service::ReviewService;

/// Fields of an account about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User not found with id of {}", id)))
    }

    #[instrument(skip(db, new_user), fields(user.email = %new_user.email, user.role = %new_user.role))]
    pub async fn create_user(db: &PgPool, new_user: NewUser) -> Result<User, AppError> {
        let email = normalize_email(&new_user.email);
        let password_hash = hash_password(&new_user.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, role, avatar, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(new_user.name.trim())
        .bind(&email)
        .bind(new_user.role)
        .bind(gravatar_url(&email))
        .bind(password_hash)
        .fetch_one(db)
        .await?;

        info!(user.id = %user.id, "User created");
        Ok(user)
    }

    /// Applies the present fields. A new email also refreshes the avatar.
    ///
    /// A role change carries over to the user's bootcamps, so demoting an
    /// admin who owns several of them is refused with a conflict.
    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &PgPool,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let email = dto.email.as_deref().map(normalize_email);
        let avatar = email.as_deref().map(gravatar_url);

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                avatar = COALESCE($4, avatar),
                role = COALESCE($5, role)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(email)
        .bind(avatar)
        .bind(dto.role)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User not found with id of {}", id)))?;

        let owner_is_admin = user.role.is_admin();
        let synced = sqlx::query(
            "UPDATE bootcamps SET owner_is_admin = $2
             WHERE user_id = $1 AND owner_is_admin <> $2",
        )
        .bind(id)
        .bind(owner_is_admin)
        .execute(&mut *tx)
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some(ONE_PER_PUBLISHER) => AppError::conflict(format!(
                "The user with ID {} owns more than one bootcamp and must remain an admin",
                id
            )),
            _ => AppError::from(e),
        })?;

        tx.commit().await?;

        if synced.rows_affected() > 0 {
            debug!(user.id = %id, bootcamps = synced.rows_affected(), "Bootcamp ownership flag synced");
        }
        Ok(user)
    }

    /// Stores a new password hash, stamps the change one second in the past
    /// and clears any pending reset token.
    pub async fn set_password(
        conn: &mut PgConnection,
        id: UserId,
        password: &str,
    ) -> Result<User, AppError> {
        let password_hash = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET
                password_hash = $2,
                password_changed_at = NOW() - INTERVAL '1 second',
                reset_password_token = NULL,
                reset_password_expire = NULL
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User not found with id of {}", id)))?;

        debug!(user.id = %user.id, "Password updated");
        Ok(user)
    }

    /// Deletes the account with everything it owns.
    ///
    /// Bootcamps owned by the user go with their courses and reviews.
    /// Bootcamps the user only contributed to get their averages refreshed.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let contributed: Vec<BootcampId> = sqlx::query_scalar(
            "SELECT bootcamp_id FROM courses WHERE user_id = $1
             UNION
             SELECT bootcamp_id FROM reviews WHERE user_id = $1
             ORDER BY 1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM reviews WHERE bootcamp_id IN (SELECT id FROM bootcamps WHERE user_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM courses WHERE bootcamp_id IN (SELECT id FROM bootcamps WHERE user_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "User not found with id of {}",
                id
            )));
        }

        for bootcamp_id in contributed {
            BootcampService::lock(&mut tx, bootcamp_id).await?;
            CourseService::refresh_average_cost(&mut tx, bootcamp_id).await?;
            ReviewService::refresh_average_rating(&mut tx, bootcamp_id).await?;
        }

        tx.commit().await?;

        info!(user.id = %id, "User deleted");
        Ok(())
    }
}
