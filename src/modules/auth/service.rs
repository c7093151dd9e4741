use devcamper_auth::{ResetToken, create_token, hash_reset_token};
use devcamper_config::JwtConfig;
use devcamper_core::{AppError, verify_password};
use devcamper_db::PgPool;
use devcamper_models::{
    LoginDto, RegisterDto, ResetPasswordDto, Role, UpdateDetailsDto, UpdatePasswordDto,
    UpdateUserDto, User, UserId,
};
use tracing::{info, instrument, warn};

use crate::modules::users::service::{NewUser, UserService};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService;

impl AuthService {
    /// Signs a token for `user`.
    pub fn issue_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
        create_token(
            user.id.into_inner(),
            &user.name,
            &user.email,
            user.role.as_str(),
            jwt_config,
        )
    }

    /// Self-service sign-up. Admin accounts can only be created by an admin.
    #[instrument(skip(db, dto), fields(user.email = %dto.email))]
    pub async fn register(db: &PgPool, dto: RegisterDto) -> Result<User, AppError> {
        let role = dto.role.unwrap_or(Role::User);
        if role.is_admin() {
            return Err(AppError::bad_request(
                "Role must be either user or publisher",
            ));
        }

        UserService::create_user(
            db,
            NewUser {
                name: dto.name,
                email: dto.email,
                password: dto.password,
                role,
            },
        )
        .await
    }

    #[instrument(skip(db, dto), fields(user.email = %dto.email))]
    pub async fn login(db: &PgPool, dto: LoginDto) -> Result<User, AppError> {
        let user = UserService::find_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&dto.password, &user.password_hash)? {
            warn!(user.id = %user.id, "Failed login attempt");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user.id = %user.id, "User logged in");
        Ok(user)
    }

    /// Name and email only; the role is not self-editable.
    #[instrument(skip(db, dto))]
    pub async fn update_details(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateDetailsDto,
    ) -> Result<User, AppError> {
        UserService::update_user(
            db,
            user_id,
            UpdateUserDto {
                name: dto.name,
                email: dto.email,
                role: None,
            },
        )
        .await
    }

    #[instrument(skip(db, user, dto), fields(user.id = %user.id))]
    pub async fn update_password(
        db: &PgPool,
        user: &User,
        dto: UpdatePasswordDto,
    ) -> Result<User, AppError> {
        if !verify_password(&dto.current_password, &user.password_hash)? {
            return Err(AppError::unauthorized("Password is incorrect"));
        }

        let mut conn = db.acquire().await?;
        let updated = UserService::set_password(&mut conn, user.id, &dto.new_password).await?;

        info!("Password changed");
        Ok(updated)
    }

    /// Stores the digest of a fresh reset token and returns the raw token.
    #[instrument(skip(db))]
    pub async fn forgot_password(db: &PgPool, email: &str) -> Result<String, AppError> {
        let user = UserService::find_by_email(db, email)
            .await?
            .ok_or_else(|| AppError::not_found("There is no user with that email"))?;

        let token = ResetToken::generate();

        sqlx::query(
            "UPDATE users SET reset_password_token = $2, reset_password_expire = $3 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&token.hashed)
        .bind(token.expires_at)
        .execute(db)
        .await?;

        info!(user.id = %user.id, expires_at = %token.expires_at, "Password reset requested");
        Ok(token.raw)
    }

    /// Sets a new password for the holder of an unexpired reset token.
    #[instrument(skip(db, raw_token, dto))]
    pub async fn reset_password(
        db: &PgPool,
        raw_token: &str,
        dto: ResetPasswordDto,
    ) -> Result<User, AppError> {
        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users
             WHERE reset_password_token = $1 AND reset_password_expire > NOW()
             FOR UPDATE",
        )
        .bind(hash_reset_token(raw_token))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid token"))?;

        let updated = UserService::set_password(&mut tx, user.id, &dto.password).await?;
        tx.commit().await?;

        info!(user.id = %updated.id, "Password reset");
        Ok(updated)
    }
}
