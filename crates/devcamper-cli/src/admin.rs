//! Admin account creation. Admins cannot sign up through the API.

use devcamper_core::hash_password;
use devcamper_models::users::{gravatar_url, normalize_email};
use devcamper_models::{Role, UserId};
use sqlx::PgPool;

pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".into());
    }

    let email = normalize_email(email);
    let password_hash =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e))?;

    let id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (id, name, email, role, avatar, password_hash)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(UserId::new())
    .bind(name.trim())
    .bind(&email)
    .bind(Role::Admin)
    .bind(gravatar_url(&email))
    .bind(&password_hash)
    .fetch_optional(db)
    .await?;

    id.ok_or_else(|| "User with this email already exists".into())
}
